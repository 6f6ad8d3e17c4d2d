use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wordle_server::game::registry::SessionRegistry;
use wordle_server::game::render::Renderer;
use wordle_server::game::router::{classify, GameRouter, Rejection, Route};
use wordle_server::game::word::Word;
use wordle_server::game::words::{Dictionary, WordSet};
use wordle_server::http::request::{Method, Request, RequestBuilder};
use wordle_server::http::response::{Response, StatusCode};

/// Word list whose secret is always "crane".
struct FixedWords(Dictionary);

impl WordSet for FixedWords {
    fn contains(&self, word: &Word) -> bool {
        self.0.contains(word)
    }

    fn random_word(&self) -> Word {
        Word::parse("crane").unwrap()
    }
}

/// Returns the board serialization as the page body.
struct EchoRenderer;

impl Renderer for EchoRenderer {
    fn render(&self, game_state: &str) -> String {
        game_state.to_string()
    }
}

fn router() -> GameRouter {
    let words = Dictionary::parse("crane\nloops\nmason\neerie\n").unwrap();
    GameRouter::new(
        SessionRegistry::new(Duration::from_secs(600)),
        Arc::new(FixedWords(words)),
        Arc::new(EchoRenderer),
    )
}

fn request(method: Method, uri: &str) -> RequestBuilder {
    RequestBuilder::new().method(method).uri(uri)
}

fn get(uri: &str) -> Request {
    request(Method::GET, uri).build().unwrap()
}

fn guess(word: &str, cookie: &str) -> Request {
    request(Method::GET, &format!("/play.html/guess?word={}", word))
        .header("Cookie", format!("SESSID={}", cookie))
        .header("X-Requested-With", "XMLHttpRequest")
        .header("JS-Enabled", "true")
        .build()
        .unwrap()
}

/// The session id handed out in `Set-Cookie`.
fn issued_session(response: &Response) -> String {
    let cookie = response.header("Set-Cookie").expect("no Set-Cookie");
    let (pair, _) = cookie.split_once(';').unwrap();
    pair.strip_prefix("SESSID=").unwrap().to_string()
}

fn json(response: &Response) -> Value {
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    serde_json::from_slice(&response.body).unwrap()
}

async fn start_session(router: &GameRouter) -> String {
    let response = router.handle(&get("/play.html")).await;
    issued_session(&response)
}

#[test]
fn test_classify_routes() {
    assert_eq!(classify(&get("/")), Ok(Route::Root));
    assert_eq!(classify(&request(Method::POST, "/").build().unwrap()), Ok(Route::Root));
    assert_eq!(classify(&get("/play.html")), Ok(Route::Play));
    assert_eq!(classify(&request(Method::HEAD, "/play.html").build().unwrap()), Ok(Route::Play));
    assert_eq!(classify(&get("/favicon.ico")), Ok(Route::Favicon));
    assert_eq!(
        classify(&get("/play.html/guess?word=CRANE")),
        Ok(Route::Guess {
            word: Word::parse("crane").unwrap(),
            via_form: false
        })
    );

    let form = request(Method::POST, "/play.html/guess").body("guess=Mason").build().unwrap();
    assert_eq!(
        classify(&form),
        Ok(Route::Guess {
            word: Word::parse("mason").unwrap(),
            via_form: true
        })
    );
}

#[test]
fn test_classify_rejections() {
    assert_eq!(classify(&get("/nope")), Err(Rejection::NotFound));
    assert_eq!(
        classify(&request(Method::POST, "/play.html").build().unwrap()),
        Err(Rejection::MethodNotAllowed)
    );
    assert_eq!(
        classify(&request(Method::HEAD, "/play.html/guess?word=crane").build().unwrap()),
        Err(Rejection::MethodNotAllowed)
    );
    assert_eq!(classify(&get("/play.html/guess")), Err(Rejection::InvalidGuess));
    assert_eq!(classify(&get("/play.html/guess?word=cran")), Err(Rejection::InvalidGuess));
    assert_eq!(classify(&get("/play.html/guess?word=cr4ne")), Err(Rejection::InvalidGuess));
    assert_eq!(Rejection::NotFound.status(), StatusCode::NotFound);
    assert_eq!(Rejection::InvalidCookie.status(), StatusCode::BadRequest);
}

#[tokio::test]
async fn test_root_redirects_to_play_page() {
    let router = router();
    let response = router.handle(&get("/")).await;

    assert_eq!(response.status, StatusCode::SeeOther);
    assert_eq!(response.header("Location"), Some("/play.html"));
    assert!(response.header("Set-Cookie").is_some());
}

#[tokio::test]
async fn test_play_page_issues_cookie() {
    let router = router();
    let response = router.handle(&get("/play.html")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(
        response.body,
        b"-1:crane:crane;0::;1::;2::;3::;4::;5::;".to_vec()
    );

    let cookie = response.header("Set-Cookie").unwrap();
    assert!(cookie.starts_with("SESSID="));
    assert!(cookie.ends_with("; path=/; Max-Age=600"));
    assert_eq!(router.registry().len(), 1);
}

#[tokio::test]
async fn test_live_cookie_is_not_reissued() {
    let router = router();
    let id = start_session(&router).await;

    let req = request(Method::GET, "/play.html")
        .header("Cookie", format!("SESSID={}", id))
        .build()
        .unwrap();
    let response = router.handle(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.header("Set-Cookie").is_none());
    assert_eq!(router.registry().len(), 1);
}

#[tokio::test]
async fn test_unknown_cookie_gets_new_session() {
    let router = router();
    let req = request(Method::GET, "/play.html")
        .header("Cookie", "SESSID=0123abcd")
        .build()
        .unwrap();
    let response = router.handle(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_ne!(issued_session(&response), "0123abcd");
}

#[tokio::test]
async fn test_malformed_cookie_is_rejected() {
    let router = router();
    let req = request(Method::GET, "/play.html")
        .header("Cookie", "SESSID=<script>")
        .build()
        .unwrap();
    let response = router.handle(&req).await;

    assert_eq!(response.status, StatusCode::BadRequest);
    assert!(response.body.is_empty());
    assert!(router.registry().is_empty());
}

#[tokio::test]
async fn test_guess_flow_to_win() {
    let router = router();
    let id = start_session(&router).await;

    let response = router.handle(&guess("EERIE", &id)).await;
    assert_eq!(response.status, StatusCode::Ok);
    let reply = json(&response);
    assert_eq!(reply["Status"], "Playing");
    assert_eq!(reply["Message"], "0:eerie:BBYBG");

    let reply = json(&router.handle(&guess("mason", &id)).await);
    assert_eq!(reply["Message"], "1:mason:BYBYB");

    let reply = json(&router.handle(&guess("crane", &id)).await);
    assert_eq!(reply["Status"], "Win");
    assert_eq!(reply["Message"], "crane");
}

#[tokio::test]
async fn test_invalid_word_is_reported_not_counted() {
    let router = router();
    let id = start_session(&router).await;

    let response = router.handle(&guess("zzzzz", &id)).await;
    assert_eq!(response.status, StatusCode::Ok);
    let reply = json(&response);
    assert_eq!(reply["Status"], "Invalid");
    assert_eq!(reply["Message"], "zzzzz");

    let reply = json(&router.handle(&guess("loops", &id)).await);
    assert_eq!(reply["Message"], "0:loops:BBBBB");
}

#[tokio::test]
async fn test_six_misses_reveal_secret() {
    let router = router();
    let id = start_session(&router).await;

    for _ in 0..5 {
        let reply = json(&router.handle(&guess("loops", &id)).await);
        assert_eq!(reply["Status"], "Playing");
    }
    let reply = json(&router.handle(&guess("loops", &id)).await);

    assert_eq!(reply["Status"], "Gameover");
    assert_eq!(reply["Message"], "crane");
}

#[tokio::test]
async fn test_row_header_must_match_attempt() {
    let router = router();
    let id = start_session(&router).await;

    let req = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("Row", "0")
        .build()
        .unwrap();
    assert_eq!(router.handle(&req).await.status, StatusCode::Ok);

    let stale = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("Row", "0")
        .build()
        .unwrap();
    assert_eq!(router.handle(&stale).await.status, StatusCode::BadRequest);

    let garbled = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("Row", "one")
        .build()
        .unwrap();
    assert_eq!(router.handle(&garbled).await.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_invalid_client_headers_are_rejected() {
    let router = router();
    let id = start_session(&router).await;

    let ajax = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("X-Requested-With", "fetch")
        .build()
        .unwrap();
    assert_eq!(router.handle(&ajax).await.status, StatusCode::BadRequest);

    let js = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("JS-Enabled", "yes")
        .build()
        .unwrap();
    assert_eq!(router.handle(&js).await.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_form_guess_renders_page() {
    let router = router();
    let id = start_session(&router).await;

    let req = request(Method::POST, "/play.html/guess")
        .header("Cookie", format!("SESSID={}", id))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("guess=eerie")
        .build()
        .unwrap();
    let response = router.handle(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.header("Content-Type").unwrap().starts_with("text/html"));
    assert_eq!(
        response.body,
        b"-1:crane:crane;0:eerie:BBYBG;1::;2::;3::;4::;5::;".to_vec()
    );
}

#[tokio::test]
async fn test_js_disabled_guess_renders_page() {
    let router = router();
    let id = start_session(&router).await;

    let req = request(Method::GET, "/play.html/guess?word=loops")
        .header("Cookie", format!("SESSID={}", id))
        .header("JS-Enabled", "false")
        .build()
        .unwrap();
    let response = router.handle(&req).await;

    assert!(response.header("Content-Type").unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_guess_without_cookie_starts_game() {
    let router = router();
    let response = router.handle(&get("/play.html/guess?word=loops")).await;

    assert!(response.header("Set-Cookie").is_some());
    assert_eq!(json(&response)["Message"], "0:loops:BBBBB");
}

#[tokio::test]
async fn test_finished_game_is_replaced() {
    let router = router();
    let id = start_session(&router).await;
    router.handle(&guess("crane", &id)).await;

    let response = router.handle(&guess("loops", &id)).await;

    assert_ne!(issued_session(&response), id);
    assert_eq!(json(&response)["Message"], "0:loops:BBBBB");
}

#[tokio::test]
async fn test_favicon_and_unknown_paths() {
    let router = router();

    let response = router.handle(&get("/favicon.ico")).await;
    assert_eq!(response.status, StatusCode::NoContent);
    assert!(response.body.is_empty());

    let response = router.handle(&get("/index.html")).await;
    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.header("Set-Cookie").is_none());

    let response = router.handle(&request(Method::POST, "/favicon.ico").build().unwrap()).await;
    assert_eq!(response.status, StatusCode::MethodNotAllowed);
}
