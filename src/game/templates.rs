//! Server-rendered pages, kept deliberately plain: static HTML with a
//! stylesheet, no client-side framework.

use time::format_description::well_known::Rfc3339;

use crate::players::progress::SKILL_NAMES;
use crate::session::{Flash, FlashKind, SessionUser};

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
<html lang=\"et\">\
<head>\
<meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title>\
<link rel=\"stylesheet\" href=\"/styles.css\">\
</head>\
<body>\
<header class=\"site-header\"><h1>LegendIdle</h1><p>RuneScape'i stiilis brauserimängu prototüüp</p></header>\
<main class=\"page\">{flash}{body}</main>\
<footer class=\"site-footer\"><p>LegendIdle meeskond. See on varajane prototüüp, mis on loodud ideede testimiseks.</p></footer>\
</body>\
</html>",
        title = html_escape(title),
        flash = flash_banner(flash),
        body = body
    )
}

fn flash_banner(flash: Option<&Flash>) -> String {
    let Some(flash) = flash else {
        return String::new();
    };
    let class = match flash.kind {
        FlashKind::Success => "flash flash-success",
        FlashKind::Error => "flash flash-error",
    };
    format!(
        "<div class=\"{class}\" role=\"status\">{}</div>",
        html_escape(&flash.message)
    )
}

pub fn render_home(user: Option<&SessionUser>, flash: Option<&Flash>) -> String {
    let hero = "<section class=\"card\">\
<h2>Seikle LegendIdle maailmas</h2>\
<p>LegendIdle on inspiratsiooni saanud RuneScape'ist, tuues brauserisse oskuste treenimise, rahuliku kogemuse ja koha, kus iga seiklus algab ühe klikiga.</p>\
</section>";

    let body = match user {
        Some(user) => format!(
            "{hero}<section class=\"card\">\
<p>Su seanss on aktiivne{guest_note}. Jätkamiseks suundu mängu vaatesse.</p>\
<a class=\"button primary\" href=\"/game\">Ava mäng</a>\
</section>",
            guest_note = if user.is_guest() { " külalisena" } else { "" }
        ),
        None => format!("{hero}{forms}", forms = auth_forms()),
    };

    layout("LegendIdle - Avaleht", flash, &body)
}

fn auth_forms() -> String {
    "<section class=\"card\">\
<h3>Registreeru</h3>\
<form method=\"POST\" action=\"/register\">\
<label for=\"register-username\">Kasutajanimi</label>\
<input id=\"register-username\" name=\"username\" required>\
<label for=\"register-email\">E-posti aadress</label>\
<input id=\"register-email\" name=\"email\" type=\"email\" required>\
<label for=\"register-password\">Parool</label>\
<input id=\"register-password\" name=\"password\" type=\"password\" minlength=\"8\" required>\
<label for=\"register-confirm\">Kinnita parool</label>\
<input id=\"register-confirm\" name=\"confirmPassword\" type=\"password\" minlength=\"8\" required>\
<button type=\"submit\" class=\"button primary\">Registreeru</button>\
</form>\
<p class=\"help-text\">Kontoga jääb sinu progress alles ning saad mängu jätkata ükskõik kust.</p>\
</section>\
<section class=\"card\">\
<h3>Logi sisse</h3>\
<form method=\"POST\" action=\"/login\">\
<label for=\"login-username\">Kasutajanimi</label>\
<input id=\"login-username\" name=\"username\" required>\
<label for=\"login-password\">Parool</label>\
<input id=\"login-password\" name=\"password\" type=\"password\" required>\
<button type=\"submit\" class=\"button\">Logi sisse</button>\
</form>\
<p class=\"help-text\">Sinu oskuste tase, varustus ja seiklused taastuvad koheselt sisselogimisel.</p>\
</section>\
<section class=\"card\">\
<h3>Külaline</h3>\
<form method=\"POST\" action=\"/guest\">\
<button type=\"submit\" class=\"button secondary\">Alusta külalisena</button>\
</form>\
<p class=\"help-text\">Testi mängu ilma kontota. Soovi korral saad hiljem mängus olles konto luua ning progress ei kao kuhugi.</p>\
</section>"
        .to_string()
}

pub fn render_game(user: Option<&SessionUser>, flash: Option<&Flash>) -> String {
    let Some(user) = user else {
        let body = "<section class=\"card\">\
<h3>Seanss puudub</h3>\
<p>Sul puudub aktiivne seanss. Palun alusta avalehelt.</p>\
<a class=\"button\" href=\"/\">Tagasi avalehele</a>\
</section>";
        return layout("LegendIdle - Mäng", flash, body);
    };

    let progress = user.progress();
    let skill_list: String = SKILL_NAMES
        .iter()
        .map(|name| {
            let level = progress.skill(name).unwrap_or_default();
            format!(
                "<li class=\"skill-item\">\
<div><strong>{name}</strong><span class=\"skill-value\">Tase {level}</span></div>\
<form method=\"POST\" action=\"/train\" class=\"inline-form\">\
<input type=\"hidden\" name=\"skill\" value=\"{name}\">\
<button type=\"submit\" class=\"button small\">Treeni</button>\
</form>\
</li>",
                name = html_escape(name),
                level = level
            )
        })
        .collect();

    let last_training = match progress.last_training {
        Some(ts) => ts.format(&Rfc3339).unwrap_or_default(),
        None => "veel treenimata".to_string(),
    };

    let guest_note = if user.is_guest() {
        "<p class=\"help-text\">Säilita külalisena kogutud progress, luues avalehel konto.</p>"
    } else {
        ""
    };

    let body = format!(
        "<section class=\"card\">\
<h2>Tere tulemast tagasi, {username}{guest_tag}!</h2>\
<p>See on mängu prototüübi peavaade. Siin saad treenida oma oskusi, vaadata statistikat ning tulevikus ka võidelda teiste mängijatega.</p>\
{guest_note}\
</section>\
<section class=\"card\">\
<h3>Oskused</h3>\
<ul class=\"skill-list\">{skill_list}</ul>\
<p class=\"stats\">Kulda: {gold} &middot; Viimane treening: {last_training}</p>\
<p class=\"help-text\">Iga treening tõstab vastava oskuse taset ühe võrra. Tulevikus lisanduvad ressursid, varustus ja võitlus.</p>\
</section>\
<section class=\"card\">\
<form method=\"POST\" action=\"/logout\">\
<button type=\"submit\" class=\"button secondary\">Logi välja</button>\
</form>\
</section>",
        username = html_escape(user.username()),
        guest_tag = if user.is_guest() { " (külaline)" } else { "" },
        guest_note = guest_note,
        skill_list = skill_list,
        gold = progress.gold,
        last_training = html_escape(&last_training)
    );

    layout("LegendIdle - Mäng", flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::progress::Progress;

    #[test]
    fn escapes_markup_in_usernames() {
        let user = SessionUser::Guest {
            username: "<script>".to_string(),
            progress: Progress::default(),
        };
        let html = render_game(Some(&user), None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn game_without_session_shows_the_missing_session_card() {
        let html = render_game(None, None);
        assert!(html.contains("Seanss puudub"));
    }

    #[test]
    fn home_renders_flash_banner_once_given() {
        let flash = Flash {
            kind: FlashKind::Error,
            message: "Viga!".to_string(),
        };
        let html = render_home(None, Some(&flash));
        assert!(html.contains("flash-error"));
        assert!(html.contains("Viga!"));
    }
}
