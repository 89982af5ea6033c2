mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use serde_json::{json, Value};

use common::*;

fn placement_payload(
    apprentice_id: &str,
    company_id: &str,
    start_offset: i64,
    status: &str,
) -> Value {
    let start = today() + Duration::days(start_offset);
    json!({
        "apprentice_id": apprentice_id,
        "company_id": company_id,
        "tutor": "Carlos Ruiz",
        "start_date": start.to_string(),
        "end_date": (start + Duration::days(180)).to_string(),
        "objectives": "Soporte de infraestructura",
        "status": status,
    })
}

#[tokio::test]
async fn test_manual_placement_crud() {
    let (app, store) = test_app();
    let company = create_company(&app, "Acme SAS", "900.123.456-7", "info@acme.co").await;
    let apprentice = create_apprentice(&app, "Ana", "Pérez", "1020304050").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/placements",
        Some(placement_payload(&apprentice, &company, -30, "ACADEMIC")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["origin_assignment_id"].is_null());
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/placements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apprentice_name"], "Ana Pérez");
    assert_eq!(body["company_name"], "Acme SAS");

    // La bitácora se actualiza con la edición
    let mut payload = placement_payload(&apprentice, &company, -30, "PRODUCTIVE");
    payload["logbook"] = json!("Semana 1: inducción");
    let (status, body) =
        send(&app, Method::PUT, &format!("/api/placements/{id}"), Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["logbook"], "Semana 1: inducción");
    assert_eq!(body["data"]["status"], "PRODUCTIVE");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/placements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.placements().is_empty());

    let (status, _) = send(&app, Method::GET, &format!("/api/placements/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_placement_end_date_must_follow_start() {
    let (app, store) = test_app();
    let company = create_company(&app, "Acme SAS", "900.123.456-7", "info@acme.co").await;
    let apprentice = create_apprentice(&app, "Ana", "Pérez", "1020304050").await;

    let mut payload = placement_payload(&apprentice, &company, 0, "ACADEMIC");
    payload["end_date"] = payload["start_date"].clone();

    let (status, body) = send(&app, Method::POST, "/api/placements", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["__all__"].is_array(), "{body}");
    assert!(store.placements().is_empty());

    // Sin fecha de fin es válido
    let mut payload = placement_payload(&apprentice, &company, 0, "ACADEMIC");
    payload["end_date"] = Value::Null;
    let (status, _) = send(&app, Method::POST, "/api/placements", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_placement_list_filters_and_order() {
    let (app, _) = test_app();
    let acme = create_company(&app, "Acme SAS", "900.123.456-7", "info@acme.co").await;
    let beta = create_company(&app, "Beta Ltda", "800.555.444-1", "beta@beta.co").await;
    let apprentice = create_apprentice(&app, "Ana", "Pérez", "1020304050").await;

    for (company, offset, status) in [
        (&acme, -60, "COMPLETED"),
        (&acme, -10, "PRODUCTIVE"),
        (&beta, -20, "PRODUCTIVE"),
    ] {
        let (code, body) = send(
            &app,
            Method::POST,
            "/api/placements",
            Some(placement_payload(&apprentice, company, offset, status)),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{body}");
    }

    let (_, body) = send(&app, Method::GET, "/api/placements", None).await;
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["company_name"], "Acme SAS");
    assert_eq!(all[2]["status"], "COMPLETED");

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/placements?company_id={acme}&status=PRODUCTIVE"),
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_company_placement_views() {
    let (app, _) = test_app();
    let company = create_company(&app, "Acme SAS", "900.123.456-7", "info@acme.co").await;

    let statuses = ["ACADEMIC", "PRODUCTIVE", "PRODUCTIVE", "COMPLETED", "DEFERRED", "WITHDRAWN"];
    for (n, status) in statuses.iter().enumerate() {
        let apprentice = create_apprentice(&app, "Vista", "Empresa", &format!("4000000{n}")).await;
        let (code, body) = send(
            &app,
            Method::POST,
            "/api/placements",
            Some(placement_payload(&apprentice, &company, -(n as i64) * 10, status)),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{body}");
    }

    // Detalle: estadísticas y las 5 más recientes
    let (status, body) = send(&app, Method::GET, &format!("/api/companies/{company}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["stats"],
        json!({"total": 6, "productive": 2, "completed": 1, "withdrawn": 1})
    );
    let recent = body["recent_placements"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["status"], "ACADEMIC");

    let (_, body) =
        send(&app, Method::GET, &format!("/api/companies/{company}/apprentices"), None).await;
    assert_eq!(body["total"], 6);
    assert_eq!(body["with_alerts"], 2);
    assert_eq!(body["completed"], 1);

    let (_, body) =
        send(&app, Method::GET, &format!("/api/companies/{company}/logbooks"), None).await;
    assert_eq!(
        body["counts"],
        json!({
            "not_started": 1,
            "submitted": 2,
            "reviewed": 1,
            "with_observations": 1,
            "withdrawn": 1,
        })
    );
}
