//! Boot sequence against a real loopback listener.

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use rpcstub_api::HEADER_SESSION_ID;
use rpcstub_app::{AppError, BootstrapDependencies, run_app_with};
use rpcstub_config::StubConfig;
use rpcstub_test_support::{ChannelNotifier, basic_auth_header};
use tokio::sync::oneshot;

fn ephemeral_config() -> StubConfig {
    StubConfig {
        bind_addr: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        session_id: "boot-token".to_string(),
        ..StubConfig::default()
    }
}

#[tokio::test]
async fn serves_until_shutdown_signal() -> Result<()> {
    let dependencies = BootstrapDependencies::from_config(ephemeral_config())?;
    let metrics = dependencies.telemetry().clone();
    let (notifier, ready) = ChannelNotifier::channel();
    let (stop, stopped) = oneshot::channel::<()>();

    let app = run_app_with(dependencies, notifier, async move {
        let _ = stopped.await;
    });
    let client = async move {
        let addr = ready.await?;
        let client = reqwest::Client::new();

        let probe = client
            .get(format!("http://{addr}/test_connection"))
            .send()
            .await?;
        assert_eq!(probe.status(), StatusCode::OK);

        let rpc = client
            .post(format!("http://{addr}/transmission/rpc"))
            .header("authorization", basic_auth_header("username", "password"))
            .header(HEADER_SESSION_ID, "boot-token")
            .body(r#"{"method":"test_send_request","arguments":{},"tag":3}"#)
            .send()
            .await?;
        assert_eq!(rpc.status(), StatusCode::OK);
        assert_eq!(
            rpc.text().await?,
            "{\"arguments\": {\"args\": 0}, \"result\": \"success\", \"tag\": 3}\n"
        );

        let _ = stop.send(());
        anyhow::Ok(())
    };

    let (served, checked) = tokio::time::timeout(Duration::from_secs(30), async {
        tokio::join!(app, client)
    })
    .await?;
    checked?;
    served?;
    assert_eq!(metrics.rpc_calls("test_send_request"), 1);
    Ok(())
}

#[tokio::test]
async fn occupied_port_fails_to_bind() -> Result<()> {
    let holder = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let port = holder.local_addr()?.port();
    let dependencies = BootstrapDependencies::from_config(StubConfig {
        port,
        ..ephemeral_config()
    })?;
    let (notifier, _ready) = ChannelNotifier::channel();

    let result = run_app_with(dependencies, notifier, std::future::ready(())).await;
    assert!(matches!(
        result,
        Err(AppError::ApiServer {
            operation: "stub.bind",
            ..
        })
    ));
    Ok(())
}
