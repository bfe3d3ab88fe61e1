//! A scripted TCP peer for connection tests.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// One step of a [`ScriptedServer`] session.
#[derive(Clone, Debug)]
pub enum Step {
    /// Write these bytes and flush.
    Write(Vec<u8>),
    /// Pause before the next step.
    Sleep(Duration),
    /// Read exactly this many bytes from the client and record them.
    Read(usize),
}

/// Accepts one client, replays its script, then closes the socket.
pub struct ScriptedServer {
    addr: SocketAddr,
    task: JoinHandle<io::Result<Vec<u8>>>,
}

impl ScriptedServer {
    /// Bind an ephemeral localhost port and wait for a client in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns any error raised while binding.
    pub async fn start(script: Vec<Step>) -> io::Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0)).await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;
            let mut received = Vec::new();
            for step in script {
                match step {
                    Step::Write(bytes) => {
                        stream.write_all(&bytes).await?;
                        stream.flush().await?;
                    }
                    Step::Sleep(delay) => tokio::time::sleep(delay).await,
                    Step::Read(len) => {
                        let mut buf = vec![0; len];
                        stream.read_exact(&mut buf).await?;
                        received.extend_from_slice(&buf);
                    }
                }
            }
            stream.shutdown().await?;
            Ok(received)
        });
        Ok(Self { addr, task })
    }

    /// Address clients should connect to.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr { self.addr }

    /// Wait for the script to finish and return the bytes read from the
    /// client.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit by the script, or an error if the
    /// server task panicked.
    pub async fn finish(self) -> io::Result<Vec<u8>> {
        self.task.await.map_err(io::Error::other)?
    }
}
