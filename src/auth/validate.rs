use lazy_static::lazy_static;
use regex::Regex;

/// Surfaced both as a registration flash and in the availability payload.
pub const USERNAME_RULES_MESSAGE: &str = "Kasutajanimi peab olema 3-12 märki, sisaldama vähemalt ühte tähte ning võib koosneda vaid tähtedest, numbritest, tühikutest ja alakriipsudest.";

lazy_static! {
    static ref USERNAME_ALLOWED_RE: Regex =
        Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿĀ-ž0-9 _]+$").unwrap();
    static ref USERNAME_LETTER_RE: Regex = Regex::new(r"[A-Za-zÀ-ÖØ-öø-ÿĀ-ž]").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// 3-12 characters, at least one letter, restricted to letters (including
/// the Latin accented ranges), digits, spaces and underscores.
pub fn is_valid_username(username: &str) -> bool {
    if username.is_empty() {
        return false;
    }
    let len = username.chars().count();
    if !(3..=12).contains(&len) {
        return false;
    }
    if !USERNAME_ALLOWED_RE.is_match(username) {
        return false;
    }
    USERNAME_LETTER_RE.is_match(username)
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_usernames() {
        for name in ["abc", "Proovija12", "Õnne seen", "mega_mage", "kaksteistmär"] {
            assert!(is_valid_username(name), "rejected {name:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("kolmteistmärk"));
    }

    #[test]
    fn rejects_letterless_and_bad_characters() {
        assert!(!is_valid_username("12345"));
        assert!(!is_valid_username("___ _"));
        assert!(!is_valid_username("nimi!"));
        assert!(!is_valid_username("nimi@maja"));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("keegi@mail.example.ee"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("aadress"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.ee"));
    }
}
