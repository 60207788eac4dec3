mod store;

pub use store::{MemorySessionStore, SessionStore};

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::players::progress::Progress;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sid";

const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// The identity a session carries. Guests live only here; members mirror a
/// stored user. Both hold their own deep copy of the progress.
#[derive(Debug, Clone)]
pub enum SessionUser {
    Member {
        id: Uuid,
        username: String,
        email: String,
        progress: Progress,
    },
    Guest {
        username: String,
        progress: Progress,
    },
}

impl SessionUser {
    pub fn is_guest(&self) -> bool {
        matches!(self, SessionUser::Guest { .. })
    }

    pub fn username(&self) -> &str {
        match self {
            SessionUser::Member { username, .. } | SessionUser::Guest { username, .. } => username,
        }
    }

    pub fn progress(&self) -> &Progress {
        match self {
            SessionUser::Member { progress, .. } | SessionUser::Guest { progress, .. } => progress,
        }
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        match self {
            SessionUser::Member { progress, .. } | SessionUser::Guest { progress, .. } => progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot user-facing notice; consumed by the next page render.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub user: Option<SessionUser>,
    flash: Option<Flash>,
}

impl SessionData {
    pub fn set_flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind,
            message: message.into(),
        });
    }

    fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

/// Request extension carrying the resolved session id.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Response extension set by logout so the middleware advertises the rotated
/// id instead of the one the request arrived with.
#[derive(Debug, Clone)]
pub struct RotatedSession(pub String);

/// Session front: resolves cookies to records and owns the store seam.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn SessionStore>,
}

impl Sessions {
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Resolve the session named by the request cookie, or allocate a fresh
    /// one. Returns the id and a deep copy of the record.
    pub async fn attach(&self, jar: &CookieJar) -> (String, SessionData) {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if let Some(data) = self.store.load(cookie.value()).await {
                return (cookie.value().to_string(), data);
            }
        }
        let id = Self::new_id();
        self.store.save(&id, SessionData::default()).await;
        (id, SessionData::default())
    }

    /// Load a session by id; an unknown id reads as an empty record.
    pub async fn get(&self, id: &str) -> SessionData {
        self.store.load(id).await.unwrap_or_default()
    }

    pub async fn save(&self, id: &str, data: SessionData) {
        self.store.save(id, data).await;
    }

    /// Drops the old record and allocates a fresh id. Used on logout so the
    /// pre-logout identifier cannot be replayed into the new session.
    pub async fn reset(&self, old_id: &str) -> (String, SessionData) {
        self.store.delete(old_id).await;
        let id = Self::new_id();
        self.store.save(&id, SessionData::default()).await;
        (id, SessionData::default())
    }

    /// One-shot flash read: returns the pending flash and clears it.
    pub async fn take_flash(&self, id: &str) -> Option<Flash> {
        let mut data = self.store.load(id).await?;
        let flash = data.take_flash();
        if flash.is_some() {
            self.store.save(id, data).await;
        }
        flash
    }

    /// The `sid` cookie advertised with every response.
    pub fn cookie(id: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .max_age(SESSION_MAX_AGE)
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Middleware run on every route: resolves or creates the session, exposes
/// its id to handlers and re-advertises the cookie on the response.
pub async fn attach(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let (sid, _) = state.sessions.attach(&jar).await;
    req.extensions_mut().insert(SessionId(sid.clone()));

    let res = next.run(req).await;

    let cookie_id = res
        .extensions()
        .get::<RotatedSession>()
        .map(|rotated| rotated.0.clone())
        .unwrap_or(sid);
    let jar = CookieJar::new().add(Sessions::cookie(&cookie_id));
    (jar, res).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attach_without_cookie_creates_a_session() {
        let sessions = Sessions::in_memory();
        let (id, data) = sessions.attach(&CookieJar::new()).await;
        assert!(!id.is_empty());
        assert!(data.user.is_none());
        // The record is live in the store, not just the returned copy.
        let (again, _) = sessions
            .attach(&CookieJar::new().add(Cookie::new(SESSION_COOKIE, id.clone())))
            .await;
        assert_eq!(again, id);
    }

    #[tokio::test]
    async fn attach_with_stale_cookie_allocates_a_new_id() {
        let sessions = Sessions::in_memory();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "gone"));
        let (id, _) = sessions.attach(&jar).await;
        assert_ne!(id, "gone");
    }

    #[tokio::test]
    async fn reset_discards_the_old_record() {
        let sessions = Sessions::in_memory();
        let (id, mut data) = sessions.attach(&CookieJar::new()).await;
        data.user = Some(SessionUser::Guest {
            username: "Külaline-abcd".to_string(),
            progress: Progress::default(),
        });
        sessions.save(&id, data).await;

        let (new_id, new_data) = sessions.reset(&id).await;
        assert_ne!(new_id, id);
        assert!(new_data.user.is_none());
        // Old id now resolves to nothing.
        assert!(sessions.get(&id).await.user.is_none());
    }

    #[tokio::test]
    async fn flash_is_read_once() {
        let sessions = Sessions::in_memory();
        let (id, mut data) = sessions.attach(&CookieJar::new()).await;
        data.set_flash(FlashKind::Success, "Tere!");
        sessions.save(&id, data).await;

        let flash = sessions.take_flash(&id).await.expect("flash present");
        assert_eq!(flash.message, "Tere!");
        assert_eq!(flash.kind, FlashKind::Success);
        assert!(sessions.take_flash(&id).await.is_none());
    }

    #[test]
    fn cookie_carries_the_contracted_attributes() {
        let cookie = Sessions::cookie("abc");
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
