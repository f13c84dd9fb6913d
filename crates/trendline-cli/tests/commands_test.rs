//! End-to-end tests for CLI subcommands against a wiremock server.

use chrono::NaiveDate;
use trendline_cli::commands::{
    run_create, run_link, run_log, run_show, run_update, CreateArgs, LinkArgs, LogArgs, ShowArgs,
    UpdateArgs,
};
use trendline_client::{ClientConfig, TrendlineClient};
use trendline_core::ProjectId;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> TrendlineClient {
    TrendlineClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap()
}

fn date(s: &str) -> NaiveDate {
    trendline_core::parse_date(s).unwrap()
}

fn demo() -> ProjectId {
    ProjectId::new("demo").unwrap()
}

fn demo_record() -> serde_json::Value {
    serde_json::json!({
        "projectId": "demo",
        "projectName": "Demo",
        "totalTasks": 10,
        "startDate": "2024-01-01",
        "endDate": "2024-01-11",
        "dailyProgress": {"2024-01-01": 2, "2024-01-02": 3}
    })
}

async fn mount_demo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/project"))
        .and(query_param("id", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(demo_record()))
        .mount(server)
        .await;
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

// ── create ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_posts_project_and_prints_share_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/project"))
        .and(body_json(serde_json::json!({
            "projectId": "demo",
            "projectName": "Demo",
            "totalTasks": 10,
            "startDate": "2024-01-01",
            "endDate": "2024-01-11"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let args = CreateArgs {
        id: demo(),
        tasks: 10,
        start: date("2024-01-01"),
        end: date("2024-01-11"),
        name: Some("Demo".into()),
        no_overwrite: false,
    };
    let mut out = Vec::new();
    let code = run_create(&client(&server), &args, &mut out).await.unwrap();
    assert_eq!(code, 0);

    let text = output(out);
    assert!(text.contains("OK: created project demo"));
    assert!(text.contains(&format!("{}/p/demo", server.uri())));
}

#[tokio::test]
async fn create_with_inverted_dates_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let args = CreateArgs {
        id: demo(),
        tasks: 10,
        start: date("2024-01-11"),
        end: date("2024-01-01"),
        name: None,
        no_overwrite: false,
    };
    let err = run_create(&client(&server), &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "End date must be after start date");
}

#[tokio::test]
async fn create_no_overwrite_reports_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/project"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "error": "Project already exists"
        })))
        .mount(&server)
        .await;

    let args = CreateArgs {
        id: demo(),
        tasks: 10,
        start: date("2024-01-01"),
        end: date("2024-01-11"),
        name: None,
        no_overwrite: true,
    };
    let err = run_create(&client(&server), &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Project already exists"));
}

// ── show ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn show_renders_stats_chart_and_history() {
    let server = MockServer::start().await;
    mount_demo(&server).await;

    let args = ShowArgs {
        id: demo(),
        today: Some(date("2024-01-02")),
        json: false,
    };
    let mut out = Vec::new();
    run_show(&client(&server), &args, &mut out).await.unwrap();

    let text = output(out);
    assert!(text.contains("Demo"));
    assert!(text.contains("Remaining:    5"));
    assert!(text.contains("Status:       Ahead"));
    assert!(text.contains("3 tasks"));
    assert!(text.contains("Jan 2, 2024"));
}

#[tokio::test]
async fn show_json_emits_report() {
    let server = MockServer::start().await;
    mount_demo(&server).await;

    let args = ShowArgs {
        id: demo(),
        today: Some(date("2024-01-02")),
        json: true,
    };
    let mut out = Vec::new();
    run_show(&client(&server), &args, &mut out).await.unwrap();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["remaining"], 5);
    assert_eq!(report["status"], "ahead");
    assert_eq!(report["chart"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn show_unknown_project_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/project"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "Project not found"
        })))
        .mount(&server)
        .await;

    let args = ShowArgs {
        id: ProjectId::new("ghost").unwrap(),
        today: None,
        json: false,
    };
    let err = run_show(&client(&server), &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Project not found"));
}

// ── log ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn log_records_progress_inside_timeline() {
    let server = MockServer::start().await;
    mount_demo(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .and(body_json(serde_json::json!({
            "projectId": "demo",
            "date": "2024-01-03",
            "tasksCompleted": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let args = LogArgs {
        id: demo(),
        tasks: 1,
        date: Some(date("2024-01-03")),
        today: Some(date("2024-01-05")),
    };
    let mut out = Vec::new();
    run_log(&client(&server), &args, &mut out).await.unwrap();
    assert_eq!(output(out), "OK: 1 task on Jan 3, 2024 for demo\n");
}

#[tokio::test]
async fn log_future_date_is_refused_before_sending() {
    let server = MockServer::start().await;
    mount_demo(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let args = LogArgs {
        id: demo(),
        tasks: 2,
        date: Some(date("2024-01-06")),
        today: Some(date("2024-01-05")),
    };
    let err = run_log(&client(&server), &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot add progress for future dates");
}

#[tokio::test]
async fn log_outside_timeline_is_refused_before_sending() {
    let server = MockServer::start().await;
    mount_demo(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let args = LogArgs {
        id: demo(),
        tasks: 2,
        date: Some(date("2023-12-31")),
        today: Some(date("2024-01-05")),
    };
    let err = run_log(&client(&server), &args, &mut Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Date must be within project timeline");
}

// ── update ───────────────────────────────────────────────────────────

#[tokio::test]
async fn update_sends_only_given_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/project"))
        .and(body_json(serde_json::json!({
            "projectId": "demo",
            "projectName": "Renamed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let args = UpdateArgs {
        id: demo(),
        name: Some("Renamed".into()),
        start: None,
        end: None,
    };
    let mut out = Vec::new();
    run_update(&client(&server), &args, &mut out).await.unwrap();
    assert_eq!(output(out), "OK: updated project demo\n");
}

#[tokio::test]
async fn update_without_fields_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let args = UpdateArgs {
        id: demo(),
        name: None,
        start: None,
        end: None,
    };
    assert!(run_update(&client(&server), &args, &mut Vec::new())
        .await
        .is_err());
}

// ── link ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn link_prints_encoded_share_url() {
    let server = MockServer::start().await;
    let args = LinkArgs {
        id: ProjectId::new("q3 launch").unwrap(),
    };
    let mut out = Vec::new();
    run_link(&client(&server), &args, &mut out).unwrap();
    assert_eq!(output(out), format!("{}/p/q3%20launch\n", server.uri()));
}
