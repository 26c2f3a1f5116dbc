mod common;

use std::sync::Arc;

use node_checker_console::domains::inputs::{CheckInputs, InputField};
use node_checker_console::domains::network::Network;
use node_checker_console::domains::query::UrlQueryState;
use node_checker_console::error::NodeCheckerError;
use node_checker_console::services::gateway::ServiceResolver;
use node_checker_console::services::view::IDLE_HINT;
use node_checker_console::{CheckConsole, CheckEvent, CheckResult, CheckState};

use common::{basic_and_noise, ScriptedGateway};

const PUBLIC_KEY: &str = "0x44fd1324c66371b4788af0b901c9eb8088781acb29e6b8b9c791d5d9838fbe1f";

async fn loaded_console(gateway: Arc<ScriptedGateway>, query: UrlQueryState) -> CheckConsole {
    let mut console = CheckConsole::new(gateway, ServiceResolver::default(), Network::Testnet, query);
    console.settle().await;
    console
}

#[tokio::test]
async fn submission_round_trips_through_shareable_query() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    assert_eq!(console.view().status_text.as_deref(), Some(IDLE_HINT));

    console.set_input(InputField::Url, "http://node.example:8080");
    console.set_input(InputField::ApiPort, "8080");
    console.dispatch(CheckEvent::ConfigurationSelected("cfg_basic".to_string()));
    let result = console.check().await;
    assert!(matches!(result, Some(CheckResult::Success(_))));

    let shared = console.view().share_query;
    let query = UrlQueryState::parse(&shared);
    assert_eq!(query.get("url"), Some("http://node.example:8080"));
    assert_eq!(query.get("apiPort"), Some("8080"));
    assert_eq!(query.get("noisePort"), Some(""));
    assert_eq!(query.get("metricsPort"), Some(""));
    assert_eq!(query.get("publicKey"), Some(""));
    assert_eq!(query.get("baselineConfig"), Some("cfg_basic"));
    assert_eq!(query.network(), Some(Network::Testnet));

    let (service_url, request) = gateway.requests.lock().await[0].clone();
    assert_eq!(service_url, "https://node-checker.dev.gcp.aptosdev.com");
    assert_eq!(request.node_url, "http://node.example:8080");
    assert_eq!(request.api_port, Some(8080));
    assert_eq!(request.noise_port, None);
    assert_eq!(request.public_key, None);

    let replay = loaded_console(gateway, query).await;
    assert_eq!(
        replay.orchestrator().inputs(),
        &CheckInputs {
            url: "http://node.example:8080".to_string(),
            api_port: "8080".to_string(),
            ..CheckInputs::default()
        }
    );
    assert_eq!(
        replay.orchestrator().selected_configuration().map(|c| c.id.as_str()),
        Some("cfg_basic")
    );
    assert_eq!(replay.orchestrator().state(), &CheckState::Idle);
}

#[tokio::test]
async fn public_key_requirement_follows_selected_configuration() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");

    console.dispatch(CheckEvent::ConfigurationSelected("cfg_noise".to_string()));
    assert!(console.orchestrator().requirements().public_key);
    assert!(!console.orchestrator().can_submit());
    console.dispatch(CheckEvent::SubmitRequested);
    assert_eq!(console.pending(), 0);

    console.set_input(InputField::PublicKey, PUBLIC_KEY);
    assert!(console.orchestrator().can_submit());

    console.dispatch(CheckEvent::ConfigurationSelected("cfg_basic".to_string()));
    assert!(!console.orchestrator().requirements().public_key);
    assert_eq!(console.orchestrator().inputs().public_key, PUBLIC_KEY);

    console.check().await;
    let requests = gateway.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.public_key.as_deref(), Some(PUBLIC_KEY));
}

#[tokio::test]
async fn remote_failure_keeps_inputs_and_reports_detail() {
    let gateway = Arc::new(
        ScriptedGateway::new(basic_and_noise()).with_check_response(Err(NodeCheckerError::Api {
            status: 503,
            body: r#"{"statusCode":503,"message":"service unavailable"}"#.to_string(),
        })),
    );
    let mut console = loaded_console(gateway, UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example:8080");
    console.set_input(InputField::NoisePort, "6180");
    let submitted = console.orchestrator().inputs().clone();

    let result = console.check().await.cloned();
    let Some(CheckResult::Failure(message)) = result.clone() else {
        panic!("expected failure, got {result:?}");
    };
    assert!(message.contains("service unavailable"));
    assert_eq!(console.orchestrator().inputs(), &submitted);
    assert_eq!(console.view().error.as_deref(), Some(message.as_str()));

    console.dispatch(CheckEvent::ErrorDismissed);
    assert!(console.view().error.is_none());
    assert!(console.orchestrator().can_submit());
}

#[tokio::test]
async fn unreachable_service_blocks_submission() {
    let gateway = Arc::new(ScriptedGateway::unreachable());
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;

    assert!(console.orchestrator().registry().is_empty());
    assert!(console.orchestrator().selected_configuration().is_none());
    let error = console.view().error.unwrap_or_default();
    assert!(error.contains("https://node-checker.dev.gcp.aptosdev.com"));

    console.set_input(InputField::Url, "http://node.example");
    console.dispatch(CheckEvent::SubmitRequested);
    assert_eq!(console.pending(), 0);
    console.settle().await;
    assert_eq!(gateway.check_calls(), 0);
    assert_eq!(gateway.configuration_calls(), 1);
}

#[tokio::test]
async fn second_submit_while_checking_is_ignored() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");

    console.dispatch(CheckEvent::SubmitRequested);
    let checking = console.orchestrator().state().clone();
    console.dispatch(CheckEvent::SubmitRequested);
    assert_eq!(console.pending(), 1);
    assert_eq!(console.orchestrator().state(), &checking);
    assert!(console.view().checking);

    console.settle().await;
    assert_eq!(gateway.check_calls(), 1);
    assert!(matches!(
        console.orchestrator().result(),
        Some(CheckResult::Success(_))
    ));
}

#[tokio::test]
async fn network_change_discards_late_check_result() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");
    console.dispatch(CheckEvent::SubmitRequested);

    console.dispatch(CheckEvent::NetworkChanged(Network::Local));
    console.settle().await;

    assert_eq!(gateway.check_calls(), 1);
    assert_eq!(console.orchestrator().state(), &CheckState::Idle);
    assert!(console.orchestrator().result().is_none());
    assert_eq!(
        gateway.configuration_urls.lock().await.last().map(String::as_str),
        Some("http://127.0.0.1:20121")
    );
    assert_eq!(
        console.orchestrator().selected_configuration().map(|c| c.id.as_str()),
        Some("cfg_basic")
    );
}

#[tokio::test]
async fn url_state_change_reseeds_inputs_and_clears_result() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway, UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");
    console.check().await;
    assert!(console.orchestrator().result().is_some());

    let query = UrlQueryState::parse("url=https%3A%2F%2Fother.example&baselineConfig=cfg_noise");
    console.dispatch(CheckEvent::UrlStateChanged(query));
    assert!(console.orchestrator().result().is_none());
    assert_eq!(console.orchestrator().inputs().url, "https://other.example");
    assert_eq!(console.orchestrator().inputs().api_port, "");
    assert_eq!(
        console.orchestrator().selected_configuration().map(|c| c.id.as_str()),
        Some("cfg_noise")
    );
}

#[tokio::test]
async fn url_state_change_during_check_keeps_single_request() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");

    console.dispatch(CheckEvent::SubmitRequested);
    let checking = console.orchestrator().state().clone();
    console.dispatch(CheckEvent::UrlStateChanged(UrlQueryState::parse(
        "url=http%3A%2F%2Fother.example",
    )));
    console.dispatch(CheckEvent::SubmitRequested);
    assert_eq!(console.pending(), 1);
    assert_eq!(console.orchestrator().state(), &checking);
    assert_eq!(
        console.orchestrator().query().get("url"),
        Some("http://node.example")
    );

    console.settle().await;
    assert_eq!(gateway.check_calls(), 1);
    assert!(matches!(
        console.orchestrator().result(),
        Some(CheckResult::Success(_))
    ));
}

#[tokio::test]
async fn resubmit_after_network_change_waits_for_abandoned_check() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");
    console.dispatch(CheckEvent::SubmitRequested);

    console.dispatch(CheckEvent::NetworkChanged(Network::Local));
    console.dispatch(CheckEvent::SubmitRequested);
    assert_eq!(console.pending(), 2);
    assert!(!console.orchestrator().can_submit());

    console.settle().await;
    assert_eq!(gateway.check_calls(), 1);
    assert_eq!(console.orchestrator().state(), &CheckState::Idle);
    assert!(console.orchestrator().can_submit());

    let result = console.check().await;
    assert!(matches!(result, Some(CheckResult::Success(_))));
    assert_eq!(gateway.check_calls(), 2);
    let requests = gateway.requests.lock().await;
    assert_eq!(requests[1].0, "http://127.0.0.1:20121");
    assert_eq!(requests[1].1.node_url, "http://node.example");
}

#[tokio::test]
async fn padded_port_is_rejected_before_sending() {
    let gateway = Arc::new(ScriptedGateway::new(basic_and_noise()));
    let mut console = loaded_console(gateway.clone(), UrlQueryState::new()).await;
    console.set_input(InputField::Url, "http://node.example");
    console.set_input(InputField::ApiPort, "\t8080\n");

    assert_eq!(console.view().validation.invalid_fields(), vec![InputField::ApiPort]);
    assert!(console.check().await.is_none());
    assert_eq!(gateway.check_calls(), 0);
}
