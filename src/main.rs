//! `streamframe` binary: connect to a server and log every frame received.

mod cli;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, QueuePolicyArg};
use streamframe::{
    CloseReason,
    ConsumerConfig,
    DecoderConfig,
    Frame,
    FullQueuePolicy,
    ZeroLengthPolicy,
    connection::{Connection, ConnectionConfig, ServerAddress},
};
use tracing::{info, warn};

impl From<QueuePolicyArg> for FullQueuePolicy {
    fn from(arg: QueuePolicyArg) -> Self {
        match arg {
            QueuePolicyArg::Backpressure => Self::Backpressure,
            QueuePolicyArg::Error => Self::ReturnErrorIfFull,
            QueuePolicyArg::Drop => Self::DropIfFull,
            QueuePolicyArg::WarnDrop => Self::WarnAndDropIfFull,
        }
    }
}

fn config_from(cli: &Cli) -> ConnectionConfig {
    let zero_length = if cli.reject_empty {
        ZeroLengthPolicy::Reject
    } else {
        ZeroLengthPolicy::Accept
    };
    ConnectionConfig::default()
        .decoder(
            DecoderConfig::default()
                .max_payload_size(cli.max_payload)
                .zero_length(zero_length),
        )
        .queue_capacity(cli.queue_capacity)
        .full_queue_policy(cli.policy.into())
        .consumer(
            ConsumerConfig::default()
                .poll_interval(Duration::from_millis(cli.poll_interval_ms)),
        )
}

#[cfg(feature = "metrics")]
fn install_metrics(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = cli.metrics_addr {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!(%addr, "serving metrics");
    }
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_metrics(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.metrics_addr.is_some() {
        warn!("built without the metrics feature; --metrics-addr ignored");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    install_metrics(&cli)?;

    let address: ServerAddress = cli.addr.parse()?;
    let (connection, receiver) = Connection::builder()
        .config(config_from(&cli))
        .on_disconnect(|reason: &CloseReason| info!(%reason, "channel inactive"))
        .connect(address)
        .await?;

    let consumer = connection.consumer(receiver, |frame: Frame| {
        let header = frame.header();
        info!(
            id = header.id(),
            context = header.context(),
            packet_type = header.packet_type(),
            size = frame.payload_size(),
            "frame received"
        );
    });
    let stop = consumer.shutdown_token();
    let task = consumer.spawn();

    tokio::select! {
        reason = connection.closed() => {
            if !reason.is_clean() {
                warn!(%reason, "connection failed");
            }
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("interrupted");
            connection.shutdown().await;
            stop.cancel();
        }
    }

    let exit = task.await?;
    info!(dispatched = exit.dispatched, reason = ?exit.reason, "consumer stopped");
    Ok(())
}
