//! Test chitthi client.
//!
//! Sends raw lines and reads server lines with timeouts.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send one line, appending `\n` unless already terminated.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes as-is.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line from the server.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout. A closed connection is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive `n` lines.
    pub async fn recv_n(&mut self, n: usize) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::with_capacity(n);
        for _ in 0..n {
            lines.push(self.recv().await?);
        }
        Ok(lines)
    }

    /// Assert that nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(line) => anyhow::bail!("unexpected line: {line:?}"),
            Err(_) => Ok(()),
        }
    }

    /// Wait for the server to close the connection, discarding any lines
    /// that arrive first.
    pub async fn expect_closed(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            match timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await? {
                Ok(0) | Err(_) => return Ok(lines),
                Ok(_) => lines.push(line.trim_end_matches(['\r', '\n']).to_string()),
            }
        }
    }

    /// Close the write half, signalling end-of-stream.
    pub async fn hang_up(&mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
