use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agenda_cell::models::TurnoState;
use agenda_cell::{PatientAgenda, TurnoService};
use agenda_cell::AgendaProvider;
use shared_config::ApiConfig;
use shared_http::{ApiClient, AuthSession, MemoryTokenStore};
use shared_models::auth::TokenPair;
use shared_models::error::ApiError;

fn authed_client(server: &MockServer) -> Arc<ApiClient> {
    let config = ApiConfig::with_base_url(server.uri());
    let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair {
        access: "acc-1".to_string(),
        refresh: "ref-1".to_string(),
    }));
    let session = Arc::new(AuthSession::new(&config, store));
    Arc::new(ApiClient::new(&config, session))
}

fn turno_body(id: i64, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nutricionista": 5,
        "paciente": 7,
        "ubicacion": 11,
        "tipo_consulta": 3,
        "start_time": "2026-08-10T09:00:00-03:00",
        "end_time": "2026-08-10T10:00:00-03:00",
        "state": state
    })
}

#[tokio::test]
async fn listing_sends_bearer_and_decodes_turnos() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/agenda/turnos/"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([turno_body(1, "CONFIRMADO")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = TurnoService::new(authed_client(&server));
    let turnos = service.list(None).await.unwrap();
    assert_eq!(turnos.len(), 1);
    assert_eq!(turnos[0].state, TurnoState::Confirmado);
}

#[tokio::test]
async fn mis_turnos_filters_by_date_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/agenda/turnos/mis-turnos/"))
        .and(query_param("fecha_inicio", "2026-08-10"))
        .and(query_param("fecha_fin", "2026-08-14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let service = TurnoService::new(authed_client(&server));
    let turnos = service
        .mis_turnos(
            chrono::NaiveDate::from_ymd_opt(2026, 8, 10),
            chrono::NaiveDate::from_ymd_opt(2026, 8, 14),
        )
        .await
        .unwrap();
    assert!(turnos.is_empty());
}

#[tokio::test]
async fn aprobar_conflict_surfaces_verbatim_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agenda/turnos/42/aprobar/"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "Conflicto de horario detectado (incluyendo tiempos de preparación). No se puede aprobar."
        })))
        .mount(&server)
        .await;

    let service = TurnoService::new(authed_client(&server));
    let result = service.aprobar(42).await;
    match result {
        Err(ApiError::Domain(msg)) => assert!(msg.starts_with("Conflicto de horario")),
        other => panic!("expected Domain error, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelar_returns_updated_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agenda/turnos/42/cancelar/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(turno_body(42, "CANCELADO")))
        .expect(1)
        .mount(&server)
        .await;

    let service = TurnoService::new(authed_client(&server));
    let turno = service.cancelar(42).await.unwrap();
    assert_eq!(turno.state, TurnoState::Cancelado);
}

#[tokio::test]
async fn authenticated_slot_query_uses_agenda_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/agenda/nutricionista/5/slots/"))
        .and(query_param("fecha_inicio", "2026-08-10"))
        .and(query_param("fecha_fin", "2026-08-10"))
        .and(query_param("duracion", "60"))
        .and(query_param("ubicacion_id", "11"))
        .and(query_param("tipo_consulta_id", "3"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"inicio": "2026-08-10T09:00:00-03:00", "fin": "2026-08-10T10:00:00-03:00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PatientAgenda::new(authed_client(&server));
    let slots = provider
        .available_slots(&agenda_cell::models::SlotQueryParams {
            nutricionista_id: 5,
            ubicacion_id: 11,
            tipo_consulta_id: 3,
            duration_minutes: 60,
            fecha_inicio: chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            fecha_fin: chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_label(), "09:00");
}

#[tokio::test]
async fn quick_booking_lists_times_and_creates_appointment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/available-times/"))
        .and(query_param("date", "2026-08-10"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time_slots": [
                {"time": "09:00", "is_available": true},
                {"time": "10:00", "is_available": false}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments/"))
        .and(wiremock::matchers::body_partial_json(json!({
            "appointment_date": "2026-08-10",
            "appointment_time": "09:00",
            "consultation_type": "seguimiento",
            "duration_minutes": 60
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "appointment_date": "2026-08-10",
            "appointment_time": "09:00",
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = agenda_cell::AppointmentsService::new(authed_client(&server));
    let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();

    let times = service.available_times(date).await.unwrap();
    assert_eq!(times.len(), 2);
    assert!(times[0].is_available);
    assert!(!times[1].is_available);

    let appointment = service
        .create(&agenda_cell::services::appointments::AppointmentRequest {
            appointment_date: date,
            appointment_time: "09:00".to_string(),
            consultation_type: "seguimiento".to_string(),
            notes: String::new(),
            duration_minutes: 60,
        })
        .await
        .unwrap();
    assert_eq!(appointment.id, 77);
}
