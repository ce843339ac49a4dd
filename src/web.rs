//! HTTP front end: the story form page and its JSON API.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::budget::estimate_max_tokens;
use crate::choices::{Audience, Genre, Language, Model, PointOfView, Tone};
use crate::export::{content_disposition, STORY_CONTENT_TYPE};
use crate::generate::{generate_story, CompletionClient};
use crate::prompt::build_prompt;
use crate::request::{
    check_target_words, check_temperature, GenerationSettings, StoryRequest, DEFAULT_TARGET_WORDS,
    DEFAULT_TEMPERATURE, TARGET_WORDS_RANGE, TARGET_WORDS_STEP, TEMPERATURE_RANGE,
    TEMPERATURE_STEP,
};

struct AppState {
    completions: Arc<dyn CompletionClient>,
    last_story: Mutex<Option<String>>,
}

pub fn router(completions: Arc<dyn CompletionClient>) -> Router {
    let state = Arc::new(AppState {
        completions,
        last_story: Mutex::new(None),
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_get))
        .route("/options", get(options_get))
        .route("/estimate", get(estimate_get))
        .route("/story", get(story_get).post(story_post))
        .route("/story.txt", get(story_txt_get))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_get() -> Html<&'static str> {
    Html(include_str!("../www/index.html"))
}

#[derive(Serialize)]
struct Choices<T: 'static> {
    options: &'static [T],
    default: T,
}

impl<T: Copy + Default> Choices<T> {
    fn of(options: &'static [T]) -> Self {
        Self {
            options,
            default: T::default(),
        }
    }
}

#[derive(Serialize)]
struct Slider<T> {
    min: T,
    max: T,
    step: T,
    default: T,
}

#[derive(Serialize)]
struct FormOptions {
    genre: Choices<Genre>,
    tone: Choices<Tone>,
    pov: Choices<PointOfView>,
    audience: Choices<Audience>,
    language: Choices<Language>,
    model: Choices<Model>,
    target_words: Slider<u32>,
    temperature: Slider<f32>,
}

async fn options_get() -> Json<FormOptions> {
    Json(FormOptions {
        genre: Choices::of(Genre::ALL),
        tone: Choices::of(Tone::ALL),
        pov: Choices::of(PointOfView::ALL),
        audience: Choices::of(Audience::ALL),
        language: Choices::of(Language::ALL),
        model: Choices::of(Model::ALL),
        target_words: Slider {
            min: *TARGET_WORDS_RANGE.start(),
            max: *TARGET_WORDS_RANGE.end(),
            step: TARGET_WORDS_STEP,
            default: DEFAULT_TARGET_WORDS,
        },
        temperature: Slider {
            min: *TEMPERATURE_RANGE.start(),
            max: *TEMPERATURE_RANGE.end(),
            step: TEMPERATURE_STEP,
            default: DEFAULT_TEMPERATURE,
        },
    })
}

#[derive(Deserialize)]
struct EstimateQuery {
    target_words: i64,
}

#[derive(Serialize)]
struct Estimate {
    target_words: i64,
    max_tokens: u16,
}

async fn estimate_get(query: Query<EstimateQuery>) -> Json<Estimate> {
    Json(Estimate {
        target_words: query.target_words,
        max_tokens: estimate_max_tokens(query.target_words),
    })
}

/// Body of `POST /story`: the form fields plus model settings, all optional.
#[derive(Debug, Deserialize)]
struct StoryForm {
    #[serde(flatten)]
    request: StoryRequest,
    #[serde(flatten)]
    settings: GenerationSettings,
}

#[derive(Serialize)]
struct StoryResponse {
    story: String,
    max_tokens: u16,
}

async fn story_post(
    State(state): State<Arc<AppState>>,
    Json(form): Json<StoryForm>,
) -> Result<Json<StoryResponse>, Error> {
    let StoryForm { request, settings } = form;
    check_target_words(request.target_words)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;
    check_temperature(settings.temperature)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let prompt = build_prompt(&request);
    let max_tokens = estimate_max_tokens(request.target_words.into());

    let story = generate_story(
        state.completions.as_ref(),
        settings.model,
        &prompt,
        settings.temperature,
        max_tokens,
    )
    .await
    .map_err(|e| {
        log::error!("generate_story error: {}", e);
        let status_code = if e.is_authentication() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::BAD_GATEWAY
        };
        error(status_code, format!("Failed to generate story: {}", e))
    })?;

    *state.last_story.lock().await = Some(story.clone());
    Ok(Json(StoryResponse { story, max_tokens }))
}

#[derive(Serialize)]
struct LastStory {
    story: String,
}

async fn last_story(state: &AppState) -> Result<String, Error> {
    state
        .last_story
        .lock()
        .await
        .clone()
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "No story has been generated yet".to_string()))
}

async fn story_get(State(state): State<Arc<AppState>>) -> Result<Json<LastStory>, Error> {
    let story = last_story(&state).await?;
    Ok(Json(LastStory { story }))
}

async fn story_txt_get(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, Error> {
    let story = last_story(&state).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, STORY_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition()),
        ],
        story,
    ))
}

pub fn error(status_code: StatusCode, msg: String) -> Error {
    Error {
        status_code,
        err: anyhow::anyhow!(msg),
    }
}

pub struct Error {
    status_code: StatusCode,
    err: anyhow::Error,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code, self.err.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthenticationError, GenerationError};
    use crate::generate::testing::FakeCompletions;
    use axum::body::Body;
    use http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_story(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/story")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn serves_form_page() {
        let app = router(Arc::new(FakeCompletions::new(&[])));
        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn lists_form_options() {
        let app = router(Arc::new(FakeCompletions::new(&[])));
        let (status, body) = send(&app, get("/options")).await;
        assert_eq!(status, StatusCode::OK);
        let options: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(options["genre"]["default"], "Fantasy");
        assert_eq!(options["tone"]["default"], "Hopeful");
        assert_eq!(options["pov"]["options"][3], "Third person omniscient");
        assert_eq!(options["model"]["options"], json!(["gpt-4", "gpt-3.5-turbo"]));
        assert_eq!(options["target_words"]["min"], 200);
        assert_eq!(options["target_words"]["max"], 4000);
        assert_eq!(options["target_words"]["default"], 900);
    }

    #[tokio::test]
    async fn estimates_tokens() {
        let app = router(Arc::new(FakeCompletions::new(&[])));
        let (_, body) = send(&app, get("/estimate?target_words=900")).await;
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"target_words": 900, "max_tokens": 1197})
        );
        let (_, body) = send(&app, get("/estimate?target_words=4000")).await;
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["max_tokens"], 4096);
    }

    #[tokio::test]
    async fn generates_and_exports_story() {
        let completions = Arc::new(FakeCompletions::new(&["The Fog\n\nIt came at dusk."]));
        let app = router(completions.clone());

        let (status, body) = send(
            &app,
            post_story(json!({
                "premise": "A lighthouse keeper hears whispers",
                "genre": "Horror",
                "model": "gpt-3.5-turbo",
                "temperature": 1.2,
                "target_words": 1000
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["story"], "The Fog\n\nIt came at dusk.");
        assert_eq!(response["max_tokens"], 1330);

        {
            let requests = completions.requests.lock().unwrap();
            assert_eq!(requests[0].model, "gpt-3.5-turbo");
            assert_eq!(requests[0].temperature, 1.2);
            let prompt = &requests[0].messages[2].content;
            assert!(prompt.contains("Premise: A lighthouse keeper hears whispers\n"));
            assert!(prompt.contains("Genre: Horror\n"));
            assert!(prompt.contains("Tone/Mood: Hopeful\n"));
        }

        let response = app.clone().oneshot(get("/story.txt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"story.txt\""
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"The Fog\n\nIt came at dusk.");
    }

    #[tokio::test]
    async fn no_story_yet() {
        let app = router(Arc::new(FakeCompletions::new(&[])));
        let (status, _) = send(&app, get("/story.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, get("/story")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failure_keeps_previous_story() {
        let completions = Arc::new(FakeCompletions::sequence(vec![
            Ok(vec!["First story".to_string()]),
            Err(GenerationError::Request("connection reset".into())),
        ]));
        let app = router(completions);

        let (status, _) = send(&app, post_story(json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, post_story(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body,
            "Failed to generate story: completion request failed: connection reset"
        );

        let (status, body) = send(&app, get("/story")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["story"], "First story");
    }

    #[tokio::test]
    async fn rejected_key_is_service_unavailable() {
        let app = router(Arc::new(FakeCompletions::failing(
            AuthenticationError::Rejected("Incorrect API key provided".into()).into(),
        )));
        let (status, body) = send(&app, post_story(json!({}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            "Failed to generate story: API key rejected: Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn out_of_range_input_is_rejected_before_generation() {
        let completions = Arc::new(FakeCompletions::new(&["unused"]));
        let app = router(completions.clone());

        let (status, body) = send(&app, post_story(json!({"target_words": 5000}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("between 200 and 4000 words"));

        let (status, _) = send(&app, post_story(json!({"temperature": 2.5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(completions.request_count(), 0);
    }

    #[tokio::test]
    async fn unknown_choice_is_rejected() {
        let app = router(Arc::new(FakeCompletions::new(&["unused"])));
        let (status, _) = send(&app, post_story(json!({"genre": "Western"}))).await;
        assert!(status.is_client_error());
    }
}
