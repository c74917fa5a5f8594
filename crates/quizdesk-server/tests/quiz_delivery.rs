use serde_json::{json, Value};

use crate::common::{sample_quiz, spawn_app};

mod common;

#[tokio::test]
async fn no_active_quiz_is_not_found_everywhere() {
    let app = spawn_app().await;
    let client = app.browser();

    let page = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(page.status().as_u16(), 404);
    let body = page.text().await.unwrap();
    assert!(body.contains("No quiz is currently active"));

    let data = client.get(app.url("/api/quiz_data")).send().await.unwrap();
    assert_eq!(data.status().as_u16(), 404);
    let json: Value = data.json().await.unwrap();
    assert!(json["error"].is_string());

    let submit = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "Ada", "answers": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status().as_u16(), 404);

    let malformed = client
        .post(app.url("/api/submit"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_page_sets_cookie_and_hides_answers() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();

    let response = client.get(app.url("/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("quizdesk_session="));
    assert!(cookie.contains("HttpOnly"));

    let body = response.text().await.unwrap();
    assert!(body.contains("Science Basics"));
    assert!(body.contains("Answer every question."));
    assert!(body.contains("Mercury"));
    assert!(!body.contains("correct_answer"));
}

#[tokio::test]
async fn timer_reports_remaining_seconds() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    let response = client.get(app.url("/api/quiz_data")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["timer_minutes"], 5);
    let remaining = json["time_remaining_seconds"].as_i64().unwrap();
    assert!((290..=300).contains(&remaining), "remaining = {remaining}");
    assert!(json["start_time"].is_string());
}

#[tokio::test]
async fn full_submission_is_scored_and_saved_once() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    let body = json!({
        "student_name": "Marie Curie",
        "answers": {
            "0": "True",
            "1": "Mercury",
            "2": ["Argon", "Neon"],
            "3": " Au ",
            "4": "Plants turn light into sugar."
        }
    });
    let response = client
        .post(app.url("/api/submit"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Thanks, you're done!");

    let again = client
        .post(app.url("/api/submit"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 403);
    let json: Value = again.json().await.unwrap();
    assert_eq!(json["error"], "already submitted");

    let timer = client.get(app.url("/api/quiz_data")).send().await.unwrap();
    assert_eq!(timer.status().as_u16(), 403);

    let quiz_dir = app.results_dir.path().join("science");
    let files: Vec<String> = std::fs::read_dir(&quiz_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.iter().filter(|f| f.ends_with(".json")).count(), 1);
    assert!(files.iter().any(|f| f == "science_results.csv"));
    assert!(files.iter().any(|f| f.starts_with("Marie Curie_")));

    let json_file = files.iter().find(|f| f.ends_with(".json")).unwrap();
    let record: Value =
        serde_json::from_str(&std::fs::read_to_string(quiz_dir.join(json_file)).unwrap()).unwrap();
    assert_eq!(record["score"]["total_points"], 8.0);
    assert_eq!(record["score"]["earned_points"], 5.0);
    assert_eq!(record["score"]["percentage"], 62.5);
    assert_eq!(record["score"]["question_results"][4]["correct"], "manual");
}

#[tokio::test]
async fn missing_name_is_rejected_without_consuming_session() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    let response = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "   ", "answers": {"0": "True"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "full name is required");

    let retry = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "Ada", "answers": {"0": "True"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(retry.status().as_u16(), 200);
}

#[tokio::test]
async fn malformed_body_is_a_json_bad_request() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    let response = client
        .post(app.url("/api/submit"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let json: Value = response.json().await.unwrap();
    assert!(json["error"].is_string());

    let wrong_shape = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "Ada", "answers": {"0": 42}}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_shape.status().as_u16(), 400);
}

#[tokio::test]
async fn empty_submission_is_rejected_even_without_name_requirement() {
    let app = spawn_app().await;
    let mut quiz = sample_quiz();
    quiz.require_full_name = false;
    app.service.activate(quiz).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    let response = client
        .post(app.url("/api/submit"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "no data provided");

    let anonymous = client
        .post(app.url("/api/submit"))
        .json(&json!({"answers": {"1": "Mercury"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 200);
}

#[tokio::test]
async fn request_without_session_cookie_is_forbidden() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = reqwest::Client::new();

    let response = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "Ada", "answers": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let timer = client.get(app.url("/api/quiz_data")).send().await.unwrap();
    assert_eq!(timer.status().as_u16(), 403);
}

#[tokio::test]
async fn students_have_independent_sessions() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let alice = app.browser();
    let bob = app.browser();
    alice.get(app.url("/")).send().await.unwrap();
    bob.get(app.url("/")).send().await.unwrap();

    for (client, name) in [(&alice, "Alice"), (&bob, "Bob")] {
        let response = client
            .post(app.url("/api/submit"))
            .json(&json!({"student_name": name, "answers": {"1": "Mercury"}}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200, "{name}");
    }

    let summary = app.service.active_summary().unwrap();
    assert_eq!(summary.sessions, 2);
    assert_eq!(summary.submitted, 2);
}

#[tokio::test]
async fn reactivating_invalidates_open_sessions() {
    let app = spawn_app().await;
    app.service.activate(sample_quiz()).unwrap();
    let client = app.browser();
    client.get(app.url("/")).send().await.unwrap();

    app.service.activate(sample_quiz()).unwrap();

    let response = client
        .post(app.url("/api/submit"))
        .json(&json!({"student_name": "Ada", "answers": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "invalid session");
}
