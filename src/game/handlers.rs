use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{error, instrument};

use crate::game::templates;
use crate::players::repo;
use crate::session::{FlashKind, SessionId, SessionUser};
use crate::state::AppState;

/// Training form field.
#[derive(Debug, Deserialize)]
pub struct TrainForm {
    #[serde(default)]
    pub skill: String,
}

#[instrument(skip(state, sid))]
pub async fn home(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Html<String> {
    let flash = state.sessions.take_flash(&sid).await;
    let sess = state.sessions.get(&sid).await;
    Html(templates::render_home(sess.user.as_ref(), flash.as_ref()))
}

#[instrument(skip(state, sid))]
pub async fn game(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
) -> Html<String> {
    let flash = state.sessions.take_flash(&sid).await;
    let sess = state.sessions.get(&sid).await;
    Html(templates::render_game(sess.user.as_ref(), flash.as_ref()))
}

#[instrument(skip(state, sid, form))]
pub async fn train(
    State(state): State<AppState>,
    Extension(SessionId(sid)): Extension<SessionId>,
    Form(form): Form<TrainForm>,
) -> Redirect {
    let mut sess = state.sessions.get(&sid).await;

    if sess.user.is_none() {
        sess.set_flash(
            FlashKind::Error,
            "Treening ebaõnnestus, sest sa ei ole sisse logitud.",
        );
        state.sessions.save(&sid, sess).await;
        return Redirect::to("/");
    }

    let skill = form.skill;
    if skill.is_empty() {
        sess.set_flash(FlashKind::Error, "Oskust ei leitud.");
        state.sessions.save(&sid, sess).await;
        return Redirect::to("/game");
    }

    // Only skills already present in the session's mapping can be trained;
    // an unrecognized name must not spring a new skill into existence.
    let now = OffsetDateTime::now_utc();
    let trained = match sess.user.as_mut() {
        Some(user) => {
            let progress = user.progress_mut();
            match progress.skills.get_mut(&skill) {
                Some(level) => {
                    *level += 1;
                    progress.last_training = Some(now);
                    true
                }
                None => false,
            }
        }
        None => false,
    };

    if !trained {
        sess.set_flash(FlashKind::Error, "Valitud oskust ei saa hetkel treenida.");
        state.sessions.save(&sid, sess).await;
        return Redirect::to("/game");
    }

    let persist_error = match &sess.user {
        Some(SessionUser::Member { id, progress, .. }) => {
            repo::update_progress(&state.db, *id, progress).await.err()
        }
        _ => None,
    };

    match persist_error {
        Some(err) => {
            error!(error = %err, "failed to persist training");
            sess.set_flash(
                FlashKind::Error,
                "Treeningu salvestamine ebaõnnestus. Proovi hiljem uuesti.",
            );
        }
        None => {
            sess.set_flash(FlashKind::Success, format!("{skill} oskuse tase tõusis!"));
        }
    }
    state.sessions.save(&sid, sess).await;
    Redirect::to("/game")
}

pub async fn styles() -> Response {
    match tokio::fs::read_to_string("public/styles.css").await {
        Ok(css) => (
            [
                (header::CONTENT_TYPE, "text/css; charset=utf-8"),
                (header::CACHE_CONTROL, "public, max-age=300"),
            ],
            css,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Stylesheet not found").into_response(),
    }
}
