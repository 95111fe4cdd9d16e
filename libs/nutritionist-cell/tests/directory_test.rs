use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nutritionist_cell::models::{DisponibilidadPayload, NutritionistPayload};
use nutritionist_cell::{DirectoryService, ScheduleService};
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
async fn admin_crud_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nutritionists/"))
        .and(header("authorization", "Bearer acc-1"))
        .and(body_partial_json(json!({"nombre": "María", "apellido": "López"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "nombre": "María",
            "apellido": "López",
            "matricula": "MN-1234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/nutritionists/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = DirectoryService::new(authed_client(&server));
    let created = service
        .create(&NutritionistPayload {
            nombre: "María".to_string(),
            apellido: "López".to_string(),
            matricula: Some("MN-1234".to_string()),
            ..NutritionistPayload::default()
        })
        .await
        .unwrap();
    assert_eq!(created.full_name(), "María López");

    service.delete(5).await.unwrap();
}

#[tokio::test]
async fn public_directory_needs_no_token() {
    let server = MockServer::start().await;
    let config = ApiConfig::with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/api/public/nutricionistas/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 5,
            "nombre": "María",
            "apellido": "López"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let service = DirectoryService::new(Arc::new(ApiClient::public(&config)));
    let listed = service.public_list().await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn overlapping_availability_is_a_domain_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agenda/disponibilidades/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["El horario se superpone con otra disponibilidad."]
        })))
        .mount(&server)
        .await;

    let service = ScheduleService::new(authed_client(&server));
    let result = service
        .add_disponibilidad(&DisponibilidadPayload {
            ubicacion: Some(11),
            dia_semana: 0,
            hora_inicio: "09:00:00".parse().unwrap(),
            hora_fin: "13:00:00".parse().unwrap(),
            slot_minutes: Some(30),
        })
        .await;

    match result {
        Err(ApiError::Domain(msg)) => {
            assert_eq!(msg, "El horario se superpone con otra disponibilidad.")
        }
        other => panic!("expected Domain, got {other:?}"),
    }
}

#[tokio::test]
async fn settings_singleton_fetch_and_patch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/agenda/professional-settings/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "anticipacion_minima_horas": 2,
            "anticipacion_maxima_dias": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/agenda/professional-settings/1/"))
        .and(body_partial_json(json!({"anticipacion_minima_horas": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "anticipacion_minima_horas": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = ScheduleService::new(authed_client(&server));
    let settings = service.settings().await.unwrap();
    assert_eq!(settings.anticipacion_minima_horas, Some(2));

    let updated = service
        .update_settings(1, json!({"anticipacion_minima_horas": 4}))
        .await
        .unwrap();
    assert_eq!(updated.anticipacion_minima_horas, Some(4));
}
