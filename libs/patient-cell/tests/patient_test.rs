use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::PatientPayload;
use patient_cell::{IntakeService, PatientService};
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

#[tokio::test]
async fn list_and_create_patients() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients/"))
        .and(header("authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 7,
            "dni": "30123456",
            "nombre": "Juan",
            "apellido": "Pérez",
            "email": "juan@x.com"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/patients/"))
        .and(body_partial_json(json!({"dni": "28999888", "nombre": "Ana"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8,
            "dni": "28999888",
            "nombre": "Ana",
            "apellido": "García"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = PatientService::new(authed_client(&server));

    let patients = service.list().await.unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].full_name(), "Juan Pérez");

    let created = service
        .create(&PatientPayload {
            dni: "28999888".to_string(),
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            ..PatientPayload::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 8);
}

#[tokio::test]
async fn delete_patient_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/patients/7/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = PatientService::new(authed_client(&server));
    service.delete(7).await.unwrap();
}

#[tokio::test]
async fn duplicate_dni_surfaces_field_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patients/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "dni": ["Ya existe un paciente con este DNI."]
        })))
        .mount(&server)
        .await;

    let service = PatientService::new(authed_client(&server));
    let result = service.create(&PatientPayload::default()).await;

    match result {
        Err(ApiError::Validation { field_errors, .. }) => {
            assert_eq!(
                field_errors["dni"],
                vec!["Ya existe un paciente con este DNI.".to_string()]
            );
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn intake_lookup_and_capture_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/formulario/buscar-paciente/"))
        .and(query_param("dni", "30123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paciente": {
                "id": 7,
                "dni": "30123456",
                "nombre": "Juan",
                "apellido": "Pérez"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/formulario/captura/"))
        .and(body_partial_json(json!({
            "paciente_ref": {"id_paciente": 7, "dni": "30123456"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 55})))
        .expect(1)
        .mount(&server)
        .await;

    let service = IntakeService::new(authed_client(&server));
    let patient = service.find_patient("30123456").await.unwrap();
    assert_eq!(patient.id, 7);

    let form = patient_cell::models::IntakeForm::for_patient(&patient);
    let receipt = service.submit(&form).await.unwrap();
    assert_eq!(receipt.id, Some(55));
}

#[tokio::test]
async fn intake_unknown_dni_is_a_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/formulario/buscar-paciente/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Paciente no encontrado"
        })))
        .mount(&server)
        .await;

    let service = IntakeService::new(authed_client(&server));
    let result = service.find_patient("11111111").await;
    match result {
        Err(ApiError::Domain(msg)) => assert_eq!(msg, "Paciente no encontrado"),
        other => panic!("expected Domain, got {other:?}"),
    }
}
