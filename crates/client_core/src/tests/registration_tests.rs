use super::*;
use crate::test_support::FakeTransport;
use serde_json::json;
use shared::error::ValidationError;

fn valid_form() -> RegistrationForm {
    RegistrationForm::new("ada", "ada@example.org", "Secret1!", "Secret1!")
}

#[tokio::test]
async fn invalid_form_never_reaches_network() {
    let transport = FakeTransport::new();
    let controller = RegistrationController::new(Arc::new(transport.clone()));

    let cases = [
        (
            RegistrationForm::new("ada", "", "abc", "abc"),
            ValidationError::AllFieldsRequired,
        ),
        (
            RegistrationForm::new("ada", "ada@example.org", "abcde", "abcde"),
            ValidationError::PasswordTooShort,
        ),
        (
            RegistrationForm::new("ada", "ada@example.org", "secret1", "secret2"),
            ValidationError::PasswordMismatch,
        ),
        (
            RegistrationForm::new("ada", "nodomain", "secret1", "secret1"),
            ValidationError::InvalidEmail,
        ),
    ];

    for (form, expected) in cases {
        let outcome = controller.register(&form).await;
        assert_eq!(outcome, Some(RequestOutcome::ValidationError(expected)));
    }
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test]
async fn created_response_redirects_to_login() {
    let transport = FakeTransport::responding(201, json!({ "message": "User created" }));
    let controller = RegistrationController::new(Arc::new(transport.clone()));

    let outcome = controller.register(&valid_form()).await;

    assert_eq!(
        outcome,
        Some(RequestOutcome::Success(RegistrationReceipt {
            username: "ada".to_string(),
            redirect: Route::Login,
            notice: REGISTRATION_NOTICE,
        }))
    );
    assert_eq!(transport.call_count().await, 1);
    let request = transport.last_request().await.expect("request");
    assert_eq!(request.path, "/api/auth/register");
    assert_eq!(request.bearer, None);
    assert_eq!(
        request.body,
        Some(json!({
            "username": "ada",
            "email": "ada@example.org",
            "password": "Secret1!",
        }))
    );
}

#[tokio::test]
async fn confirm_password_is_never_sent() {
    let transport = FakeTransport::responding(201, json!({}));
    let controller = RegistrationController::new(Arc::new(transport.clone()));

    controller.register(&valid_form()).await;

    let body = transport
        .last_request()
        .await
        .and_then(|r| r.body)
        .expect("body");
    let keys: Vec<_> = body
        .as_object()
        .expect("object")
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys.len(), 3);
    assert!(!keys.iter().any(|k| k.to_ascii_lowercase().contains("confirm")));
}

#[tokio::test]
async fn non_created_success_is_an_error() {
    let transport = FakeTransport::responding(200, json!({}));
    let controller = RegistrationController::new(Arc::new(transport));

    let outcome = controller.register(&valid_form()).await;
    assert_eq!(
        outcome,
        Some(RequestOutcome::NetworkError(REGISTRATION_FAILED.to_string()))
    );
}

#[tokio::test]
async fn service_message_preferred_over_fallback() {
    let transport =
        FakeTransport::responding(409, json!({ "message": "Username already exists" }));
    let controller = RegistrationController::new(Arc::new(transport));

    let outcome = controller.register(&valid_form()).await;
    assert_eq!(
        outcome,
        Some(RequestOutcome::NetworkError(
            "Username already exists".to_string()
        ))
    );
    assert!(matches!(
        controller.state().await,
        ControllerState::Failed(crate::outcome::Failure::Network(_))
    ));
}

#[tokio::test]
async fn unparseable_error_body_uses_fallback() {
    let transport = FakeTransport::responding_raw(500, "Internal Server Error");
    let controller = RegistrationController::new(Arc::new(transport));

    let outcome = controller.register(&valid_form()).await;
    assert_eq!(
        outcome,
        Some(RequestOutcome::NetworkError(REGISTRATION_FAILED.to_string()))
    );
}

#[tokio::test]
async fn transport_failure_uses_fallback() {
    let transport =
        FakeTransport::failing(TransportError::Unreachable("connection refused".to_string()));
    let controller = RegistrationController::new(Arc::new(transport));

    let outcome = controller.register(&valid_form()).await;
    assert_eq!(
        outcome,
        Some(RequestOutcome::NetworkError(REGISTRATION_FAILED.to_string()))
    );
}

#[tokio::test]
async fn in_flight_flag_tracks_request() {
    let (transport, gate) = FakeTransport::responding(201, json!({})).gated();
    let controller = Arc::new(RegistrationController::new(Arc::new(transport.clone())));
    assert!(!controller.is_in_flight().await);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.register(&valid_form()).await })
    };
    while transport.call_count().await < 1 {
        tokio::task::yield_now().await;
    }
    assert!(controller.is_in_flight().await);

    gate.notify_one();
    assert!(matches!(
        pending.await.expect("join"),
        Some(RequestOutcome::Success(_))
    ));
    assert!(!controller.is_in_flight().await);
}

#[tokio::test]
async fn response_after_teardown_is_dropped() {
    let (transport, gate) = FakeTransport::responding(201, json!({})).gated();
    let controller = Arc::new(RegistrationController::new(Arc::new(transport.clone())));

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.register(&valid_form()).await })
    };
    while transport.call_count().await < 1 {
        tokio::task::yield_now().await;
    }
    controller.invalidate().await;
    gate.notify_one();

    assert_eq!(pending.await.expect("join"), None);
    assert_eq!(controller.state().await, ControllerState::Idle);
}
