use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::session::{session_cookie, Session};
use crate::AppState;

const DATASET_PAGE: &str = include_str!("../templates/dataset.html");

/// Dataset selection page. Requires a logged-in caller.
pub async fn dataset_page(session: Session) -> Html<String> {
    Html(DATASET_PAGE.replace("{{username}}", &escape_html(&session.username)))
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
}

/// Presence-only login: any non-empty username gets a session.
pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let username = form.username.trim();
    if username.is_empty() {
        return Redirect::to(&state.config.login_path).into_response();
    }

    info!(username, "Session started");
    let cookie = session_cookie(username, &state.config.session_secret);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/dataset")).into_response()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_usernames() {
        assert_eq!(
            escape_html("<b>\"asha\" & 'co'</b>"),
            "&lt;b&gt;&quot;asha&quot; &amp; &#39;co&#39;&lt;/b&gt;"
        );
    }
}
