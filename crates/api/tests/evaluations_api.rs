//! Evaluation submission, history and detail.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_criterion, create_member, get_auth, post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use staffeval_core::roles::Role;
use staffeval_core::types::DbId;

struct Fixture {
    admin: DbId,
    supervisor: DbId,
    staff: DbId,
    other_staff: DbId,
    quality: DbId,
    teamwork: DbId,
    punctuality: DbId,
}

async fn seed(pool: &PgPool) -> Fixture {
    Fixture {
        admin: create_member(pool, "Admin", Role::Admin).await.id,
        supervisor: create_member(pool, "Supervisor", Role::Supervisor).await.id,
        staff: create_member(pool, "Staff", Role::Staff).await.id,
        other_staff: create_member(pool, "Other", Role::Staff).await.id,
        quality: create_criterion(pool, "Quality", 50).await.id,
        teamwork: create_criterion(pool, "Teamwork", 30).await.id,
        punctuality: create_criterion(pool, "Punctuality", 20).await.id,
    }
}

fn full_submission(f: &Fixture, subject: DbId) -> serde_json::Value {
    json!({
        "subject_id": subject,
        "scores": [
            { "criterion_id": f.quality, "score": 10 },
            { "criterion_id": f.teamwork, "score": 8 },
            { "criterion_id": f.punctuality, "score": 5 }
        ]
    })
}

async fn assessment_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM assessments")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn score_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM scores")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn submit(app: axum::Router, f: &Fixture, evaluator: DbId, subject: DbId) -> DbId {
    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        full_submission(f, subject),
        &token_for(evaluator),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["assessment"]["id"]
        .as_i64()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn supervisor_submits_and_total_is_weighted(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        full_submission(&f, f.staff),
        &token_for(f.supervisor),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["assessment"]["status"], "completed");
    assert_eq!(json["data"]["assessment"]["evaluator_id"], f.supervisor);
    assert_eq!(json["data"]["summary"]["state"], "recorded");
    let total = json["data"]["summary"]["total"].as_f64().unwrap();
    assert!((total - 8.4).abs() < 1e-9, "10*0.5 + 8*0.3 + 5*0.2, got {total}");
    assert_eq!(score_count(&pool).await, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_cannot_submit(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        full_submission(&f, f.other_staff),
        &token_for(f.staff),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(assessment_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_missing_a_criterion_is_rejected(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        json!({
            "subject_id": f.staff,
            "scores": [
                { "criterion_id": f.quality, "score": 9 },
                { "criterion_id": f.teamwork, "score": 9 }
            ]
        }),
        &token_for(f.admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains(&f.punctuality.to_string()), "{message}");
    assert_eq!(assessment_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_score_and_unknown_subject_are_rejected(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(f.admin);

    let mut body = full_submission(&f, f.staff);
    body["scores"][0]["score"] = json!(11);
    let response = post_json_auth(app.clone(), "/api/v1/evaluations", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/evaluations",
        full_submission(&f, 999_999),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        full_submission(&f, f.admin),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(assessment_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_criterion_is_no_longer_required(pool: PgPool) {
    let f = seed(&pool).await;
    staffeval_db::repositories::CriterionRepo::deactivate(&pool, f.punctuality)
        .await
        .unwrap();
    let app = common::build_test_app(pool.clone());
    let token = token_for(f.admin);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/evaluations",
        full_submission(&f, f.staff),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/evaluations",
        json!({
            "subject_id": f.staff,
            "scores": [
                { "criterion_id": f.quality, "score": 6 },
                { "criterion_id": f.teamwork, "score": 4 }
            ]
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_history_is_limited_to_own_assessments(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool);

    submit(app.clone(), &f, f.supervisor, f.staff).await;
    submit(app.clone(), &f, f.supervisor, f.other_staff).await;
    submit(app.clone(), &f, f.admin, f.staff).await;

    let response = get_auth(app.clone(), "/api/v1/evaluations", &token_for(f.staff)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["subject_id"] == f.staff));
    assert_eq!(rows[0]["evaluator_name"], "Admin", "newest first");
    assert_eq!(rows[0]["summary"]["state"], "recorded");

    let response = get_auth(app, "/api/v1/evaluations", &token_for(f.supervisor)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_is_visible_to_parties_and_evaluators(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool);
    let id = submit(app.clone(), &f, f.supervisor, f.staff).await;
    let uri = format!("/api/v1/evaluations/{id}");

    for viewer in [f.staff, f.supervisor, f.admin] {
        let response = get_auth(app.clone(), &uri, &token_for(viewer)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(app, &uri, &token_for(f.staff)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["subject_name"], "Staff");
    assert_eq!(json["data"]["evaluator_name"], "Supervisor");
    let scores = json["data"]["scores"].as_array().unwrap();
    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0]["criterion_title"], "Quality");
    assert_eq!(scores[0]["criterion_weight"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_is_denied_to_unrelated_staff(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool);
    let id = submit(app.clone(), &f, f.supervisor, f.staff).await;

    let response = get_auth(
        app,
        &format!("/api/v1/evaluations/{id}"),
        &token_for(f.other_staff),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["redirect"], "/dashboard");
    assert!(json.get("data").is_none());
    assert!(!json.to_string().contains("Supervisor"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assessment_without_scores_reports_no_scores_state(pool: PgPool) {
    let f = seed(&pool).await;
    let id: DbId = sqlx::query_scalar(
        "INSERT INTO assessments (evaluator_id, subject_id, status)
         VALUES ($1, $2, 'pending') RETURNING id",
    )
    .bind(f.supervisor)
    .bind(f.staff)
    .fetch_one(&pool)
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        &format!("/api/v1/evaluations/{id}"),
        &token_for(f.staff),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["summary"]["state"], "no_scores_recorded");
    assert!(json["data"]["summary"].get("total").is_none());
    assert!(json["data"]["scores"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_assessment_is_404(pool: PgPool) {
    let f = seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/evaluations/31337", &token_for(f.admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
