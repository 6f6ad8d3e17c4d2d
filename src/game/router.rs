//! Request routing and the game protocol.
//!
//! Turns one parsed request into exactly one response: classifies the route,
//! validates the client headers, binds the request to a session, and runs
//! the guess through the session's state machine.

use std::sync::Arc;

use crate::game::registry::SessionRegistry;
use crate::game::render::Renderer;
use crate::game::session::{GuessOutcome, SessionId};
use crate::game::word::Word;
use crate::game::words::WordSet;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};

pub const PLAY_PAGE: &str = "/play.html";
const GUESS_PATH: &str = "/play.html/guess";
const FAVICON: &str = "/favicon.ico";

/// Why a request was refused before any game logic ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no such route")]
    NotFound,
    #[error("method not allowed on this route")]
    MethodNotAllowed,
    #[error("missing or malformed guess")]
    InvalidGuess,
    #[error("invalid {0} header")]
    InvalidHeader(&'static str),
    #[error("malformed session cookie")]
    InvalidCookie,
    #[error("row {row} does not match attempt {attempt}")]
    RowMismatch { row: usize, attempt: usize },
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::NotFound => StatusCode::NotFound,
            Rejection::MethodNotAllowed => StatusCode::MethodNotAllowed,
            Rejection::InvalidGuess
            | Rejection::InvalidHeader(_)
            | Rejection::InvalidCookie
            | Rejection::RowMismatch { .. } => StatusCode::BadRequest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`, redirected to the play page.
    Root,
    Play,
    /// A guess by query string (`via_form == false`) or form body.
    Guess { word: Word, via_form: bool },
    Favicon,
}

/// Maps method and target onto a route.
pub fn classify(req: &Request) -> Result<Route, Rejection> {
    let read_only = matches!(req.method, Method::GET | Method::HEAD);

    match req.path() {
        "/" => Ok(Route::Root),
        FAVICON if read_only => Ok(Route::Favicon),
        PLAY_PAGE if read_only => Ok(Route::Play),
        GUESS_PATH => match req.method {
            Method::GET => {
                let word = form_value(req.query().unwrap_or_default().as_bytes(), "word")
                    .ok_or(Rejection::InvalidGuess)?;
                Ok(Route::Guess { word, via_form: false })
            }
            Method::POST => {
                let word = form_value(&req.body, "guess").ok_or(Rejection::InvalidGuess)?;
                Ok(Route::Guess { word, via_form: true })
            }
            _ => Err(Rejection::MethodNotAllowed),
        },
        FAVICON | PLAY_PAGE => Err(Rejection::MethodNotAllowed),
        _ => Err(Rejection::NotFound),
    }
}

fn form_value(encoded: &[u8], name: &str) -> Option<Word> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| Word::parse(&value))
}

/// Client-supplied protocol headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientHints {
    pub js_enabled: Option<bool>,
    pub row: Option<usize>,
}

impl ClientHints {
    pub fn from_request(req: &Request) -> Result<Self, Rejection> {
        if req
            .header("X-Requested-With")
            .is_some_and(|v| v != "XMLHttpRequest")
        {
            return Err(Rejection::InvalidHeader("X-Requested-With"));
        }

        let js_enabled = match req.header("JS-Enabled") {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => return Err(Rejection::InvalidHeader("JS-Enabled")),
        };

        let row = req
            .header("Row")
            .map(|v| v.trim().parse::<usize>())
            .transpose()
            .map_err(|_| Rejection::InvalidHeader("Row"))?;

        Ok(Self { js_enabled, row })
    }
}

pub struct GameRouter {
    registry: SessionRegistry,
    words: Arc<dyn WordSet>,
    renderer: Arc<dyn Renderer>,
}

impl GameRouter {
    pub fn new(registry: SessionRegistry, words: Arc<dyn WordSet>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            registry,
            words,
            renderer,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Produces the response for `req`. Rejections become empty-bodied
    /// error responses.
    pub async fn handle(&self, req: &Request) -> Response {
        match self.dispatch(req).await {
            Ok(response) => response,
            Err(rejection) => {
                tracing::debug!(
                    method = req.method.as_str(),
                    uri = %req.uri,
                    reason = %rejection,
                    "Request rejected"
                );
                Response::empty(rejection.status())
            }
        }
    }

    async fn dispatch(&self, req: &Request) -> Result<Response, Rejection> {
        let route = classify(req)?;
        let hints = ClientHints::from_request(req)?;
        let presented = req
            .session_cookie()
            .map(|raw| SessionId::parse(raw).ok_or(Rejection::InvalidCookie))
            .transpose()?;

        let resolved = self
            .registry
            .resolve(presented.as_ref(), self.words.as_ref())
            .await;

        let mut response = {
            let mut state = resolved.session.lock().await;

            if let (false, Some(row)) = (resolved.is_new, hints.row) {
                if row != state.attempt() {
                    return Err(Rejection::RowMismatch {
                        row,
                        attempt: state.attempt(),
                    });
                }
            }

            match route {
                Route::Root => Response::see_other(PLAY_PAGE),
                Route::Favicon => Response::empty(StatusCode::NoContent),
                Route::Play => Response::html(self.renderer.render(&state.game_state())),
                Route::Guess { word, via_form } => {
                    let outcome = state.play(word, self.words.as_ref());
                    tracing::info!(
                        session = %resolved.id,
                        guess = %word,
                        status = outcome.status(),
                        attempt = state.attempt(),
                        "Guess evaluated"
                    );

                    if via_form || hints.js_enabled == Some(false) {
                        Response::html(self.renderer.render(&state.game_state()))
                    } else {
                        Response::json(guess_reply(&outcome))
                    }
                }
            }
        };

        if resolved.is_new {
            response.set_header(
                "Set-Cookie",
                format!(
                    "SESSID={}; path=/; Max-Age={}",
                    resolved.id,
                    self.registry.timeout().as_secs()
                ),
            );
        }

        Ok(response)
    }
}

/// `{"Status": "...", "Message": "..."}`
pub fn guess_reply(outcome: &GuessOutcome) -> String {
    serde_json::json!({
        "Status": outcome.status(),
        "Message": outcome.message(),
    })
    .to_string()
}
