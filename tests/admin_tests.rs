// tests/admin_tests.rs

mod common;

use common::{add_question, admin_token, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn admin_routes_require_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/admin/config", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = client
        .get(format!("{}/api/admin/config", address))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/admin/login", address))
        .json(&json!({ "username": "admin", "password": "anything" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn config_is_created_lazily_and_updated() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let body: Value = client
        .get(format!("{}/api/admin/config", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["config"]["quizTime"], 30);
    assert_eq!(body["config"]["passingPercentage"], 40.0);
    assert_eq!(body["config"]["totalQuestions"], 100);
    assert_eq!(body["config"]["categoryStatus"]["mern"]["isReady"], false);

    let response = client
        .post(format!("{}/api/admin/config", address))
        .bearer_auth(&token)
        .json(&json!({ "quizTime": 45, "totalQuestions": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .post(format!("{}/api/admin/config", address))
        .bearer_auth(&token)
        .json(&json!({ "passingPercentage": 120 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = client
        .get(format!("{}/api/admin/config", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["config"]["quizTime"], 45);
    assert_eq!(body["config"]["totalQuestions"], 2);
    assert_eq!(body["config"]["passingPercentage"], 40.0);
}

#[tokio::test]
async fn capacity_is_enforced() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    for marks in [40, 30, 30] {
        let resp = add_question(&client, &address, &token, "node", marks).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let resp = add_question(&client, &address, &token, "node", 5).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["currentMarks"], 100);
    assert_eq!(body["remainingMarks"], 0);

    // Rejection leaves the bank untouched
    let listing: Value = client
        .get(format!("{}/api/admin/questions", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["count"], 3);

    let stats: Value = client
        .get(format!("{}/api/admin/category-stats", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["stats"]["node"]["totalMarks"], 100);
    assert_eq!(stats["stats"]["node"]["isReady"], true);
    assert_eq!(stats["stats"]["node"]["remainingMarks"], 0);
}

#[tokio::test]
async fn create_question_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let response = client
        .post(format!("{}/api/admin/questions", address))
        .bearer_auth(&token)
        .json(&json!({
            "category": "react",
            "questionText": "Pick one",
            "options": [
                { "text": "A", "isCorrect": false },
                { "text": "B", "isCorrect": false }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/admin/questions", address))
        .bearer_auth(&token)
        .json(&json!({
            "category": "react",
            "questionText": "Pick one",
            "options": [{ "text": "A", "isCorrect": true }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn delete_question_refreshes_status() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    let created: Value = add_question(&client, &address, &token, "mongodb", 100)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(created["categoryStatus"]["isReady"], true);
    assert_eq!(created["categoryStatus"]["remaining"], 0);
    let id = created["question"]["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/api/admin/questions/{}", address, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let config: Value = client
        .get(format!("{}/api/admin/config", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(config["config"]["categoryStatus"]["mongodb"]["isReady"], false);
    assert_eq!(config["config"]["categoryStatus"]["mongodb"]["totalMarks"], 0);

    let response = client
        .delete(format!("{}/api/admin/questions/{}", address, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn dashboard_and_results_purge() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = admin_token(&client, &address).await;

    add_question(&client, &address, &token, "express", 100).await;

    for roll in ["D-1", "D-2"] {
        client
            .post(format!("{}/api/user/register", address))
            .json(&json!({ "name": "Student", "rollNumber": roll, "category": "express" }))
            .send()
            .await
            .unwrap();
    }

    let dashboard: Value = client
        .get(format!("{}/api/admin/dashboard", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["stats"]["totalStudents"], 2);
    assert_eq!(dashboard["stats"]["totalQuestions"], 1);
    assert_eq!(dashboard["stats"]["totalAttempts"], 0);
    assert_eq!(dashboard["stats"]["categoryMarks"]["express"], 100);

    let full: Value = client
        .get(format!("{}/api/admin/dashboard-full", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(full["stats"]["recentResults"].as_array().unwrap().len(), 2);
    assert_eq!(full["stats"]["categoryStatus"]["express"]["isReady"], true);

    let response = client
        .delete(format!("{}/api/admin/results", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let results: Value = client
        .get(format!("{}/api/admin/results", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["count"], 0);
}
