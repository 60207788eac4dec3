use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::dto::{AvailabilityQuery, AvailabilityResponse, LoginForm, RegisterForm};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::validate::{is_valid_email, is_valid_username, USERNAME_RULES_MESSAGE};
use crate::error::AppError;
use crate::players::error::StoreError;
use crate::players::progress::Progress;
use crate::players::repo;
use crate::players::repo_types::NewUser;
use crate::session::{FlashKind, RotatedSession, SessionData, SessionId, SessionUser};
use crate::state::AppState;

async fn flash_and_redirect(
    state: &AppState,
    sid: &str,
    mut sess: SessionData,
    kind: FlashKind,
    message: impl Into<String>,
    to: &str,
) -> Redirect {
    sess.set_flash(kind, message);
    state.sessions.save(sid, sess).await;
    Redirect::to(to)
}

#[instrument(skip(state, sid, form))]
pub async fn register(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let sess = state.sessions.get(&sid).await;

    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();
    let password = form.password;
    let confirm_password = form.confirm_password;

    if sess.user.as_ref().is_some_and(|user| !user.is_guest()) {
        warn!("register attempt on an authenticated session");
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Oled juba sisse logitud. Uue konto loomiseks logi palun kõigepealt välja.",
            "/game",
        )
        .await);
    }

    if username.is_empty() || password.is_empty() || email.is_empty() {
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Kasutajanimi, e-posti aadress ja parool peavad olema täidetud.",
            "/",
        )
        .await);
    }

    if !is_valid_username(&username) {
        return Ok(
            flash_and_redirect(&state, &sid, sess, FlashKind::Error, USERNAME_RULES_MESSAGE, "/")
                .await,
        );
    }

    if !is_valid_email(&email) {
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Palun sisesta kehtiv e-posti aadress.",
            "/",
        )
        .await);
    }

    if password != confirm_password {
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Sisestatud paroolid ei kattu.",
            "/",
        )
        .await);
    }

    if password.chars().count() < 8 {
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Parool peab olema vähemalt 8 tähemärki pikk.",
            "/",
        )
        .await);
    }

    // A registering guest takes their collected progress with them.
    let was_guest = sess.user.as_ref().is_some_and(|user| user.is_guest());
    let progress = match &sess.user {
        Some(user) if user.is_guest() => user.progress().clone(),
        _ => Progress::default(),
    };

    let password_hash = hash_password(&password)?;

    match repo::create(
        &state.db,
        NewUser {
            username,
            email,
            password_hash,
            progress,
        },
    )
    .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            let mut sess = sess;
            sess.user = Some(SessionUser::Member {
                id: user.id,
                username: user.username,
                email: user.email,
                progress: user.progress,
            });
            let message = if was_guest {
                "Konto loodud! Sinu külalisena kogutud progress salvestati uude kontosse."
            } else {
                "Konto loodud! Nüüd saad LegendIdle maailma avastada isikliku kasutajaga."
            };
            Ok(flash_and_redirect(&state, &sid, sess, FlashKind::Success, message, "/game").await)
        }
        Err(StoreError::UsernameTaken) => {
            warn!("registration username collision");
            Ok(flash_and_redirect(
                &state,
                &sid,
                sess,
                FlashKind::Error,
                "Sellise kasutajanimega konto on juba olemas. Palun vali uus nimi.",
                "/",
            )
            .await)
        }
        Err(StoreError::EmailTaken) => {
            warn!("registration email collision");
            Ok(flash_and_redirect(
                &state,
                &sid,
                sess,
                FlashKind::Error,
                "Sellise e-posti aadressiga konto on juba olemas. Palun kasuta teist aadressi või logi sisse.",
                "/",
            )
            .await)
        }
        Err(StoreError::Database(e)) => {
            error!(error = %e, "register failed");
            Ok(flash_and_redirect(
                &state,
                &sid,
                sess,
                FlashKind::Error,
                "Konto loomisel tekkis ootamatu viga. Proovi uuesti.",
                "/",
            )
            .await)
        }
    }
}

#[instrument(skip(state, sid, form))]
pub async fn login(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let mut sess = state.sessions.get(&sid).await;

    let username = form.username.trim().to_string();
    let password = form.password;

    if username.is_empty() || password.is_empty() {
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Palun täida kasutajanimi ja parool.",
            "/",
        )
        .await);
    }

    let user = repo::find_by_username(&state.db, &username).await?;
    let verified = user
        .as_ref()
        .is_some_and(|user| verify_password(&password, &user.password_hash));
    // One message for both unknown user and wrong password.
    let Some(user) = user.filter(|_| verified) else {
        warn!("login failed");
        return Ok(flash_and_redirect(
            &state,
            &sid,
            sess,
            FlashKind::Error,
            "Sisselogimine ebaõnnestus. Kontrolli kasutajanime ja parooli.",
            "/",
        )
        .await);
    };

    info!(user_id = %user.id, "user logged in");
    sess.user = Some(SessionUser::Member {
        id: user.id,
        username: user.username,
        email: user.email,
        progress: user.progress,
    });
    Ok(flash_and_redirect(
        &state,
        &sid,
        sess,
        FlashKind::Success,
        "Tere tulemast tagasi LegendIdle maailma!",
        "/game",
    )
    .await)
}

#[instrument(skip(state, sid))]
pub async fn guest(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Redirect {
    let mut sess = state.sessions.get(&sid).await;

    let suffix = Uuid::new_v4().simple().to_string();
    sess.user = Some(SessionUser::Guest {
        username: format!("Külaline-{}", &suffix[..4]),
        progress: Progress::default(),
    });
    sess.set_flash(
        FlashKind::Success,
        "Alustasid mängu külalise rollis. Head seiklemist!",
    );
    state.sessions.save(&sid, sess).await;
    Redirect::to("/game")
}

#[instrument(skip(state, sid))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Response {
    let (new_sid, mut sess) = state.sessions.reset(&sid).await;
    sess.set_flash(
        FlashKind::Success,
        "Oled edukalt välja logitud. Näeme varsti taas LegendIdle maailmas!",
    );
    state.sessions.save(&new_sid, sess).await;

    let mut res = Redirect::to("/").into_response();
    res.extensions_mut().insert(RotatedSession(new_sid));
    res
}

#[instrument(skip(state))]
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, Json<serde_json::Value>)> {
    let username = query.username.as_deref().unwrap_or("").trim();
    let email = query.email.as_deref().unwrap_or("").trim();

    if username.is_empty() && email.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing username or email" })),
        ));
    }

    let username_valid = username.is_empty() || is_valid_username(username);
    let username_available = if username.is_empty() {
        true
    } else if !username_valid {
        false
    } else {
        !repo::username_taken(&state.db, username)
            .await
            .map_err(availability_failed)?
    };
    let email_available = if email.is_empty() {
        true
    } else {
        !repo::email_taken(&state.db, email)
            .await
            .map_err(availability_failed)?
    };

    Ok(Json(AvailabilityResponse {
        username_available,
        email_available,
        username_valid: (!username.is_empty()).then_some(username_valid),
        username_message: (!username.is_empty() && !username_valid)
            .then(|| USERNAME_RULES_MESSAGE.to_string()),
    }))
}

fn availability_failed(err: StoreError) -> (StatusCode, Json<serde_json::Value>) {
    error!(error = %err, "availability check failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Availability check failed" })),
    )
}
