//! Interactive console client for chitthi.
//!
//! Usage: `chitthi-client [address]` (default `127.0.0.1:8888`).

use anyhow::Context as _;
use chitthi_proto::{EXIT_COMMAND, Frame, LineCodec};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};

const DEFAULT_ADDRESS: &str = "127.0.0.1:8888";
const LINGER: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let stream = TcpStream::connect(&address)
        .await
        .with_context(|| format!("failed to connect to {address}"))?;
    let (read_half, write_half) = stream.into_split();
    let mut incoming = FramedRead::new(read_half, LineCodec::new());
    let mut outgoing = FramedWrite::new(write_half, LineCodec::new());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(b"Enter username: ").await?;
    stdout.flush().await?;
    let Some(name) = stdin.next_line().await? else {
        return Ok(());
    };
    outgoing.send(name).await?;
    println!("Send messages as: <recipient> <message>. Type {EXIT_COMMAND} to quit.");

    // Print server lines as they arrive; stop when the server hangs up.
    let mut printer = tokio::spawn(async move {
        while let Some(frame) = incoming.next().await {
            match frame {
                Ok(Frame::Line(line)) => println!("{line}"),
                Ok(Frame::Overlong { len }) => eprintln!("(skipped {len}-byte line from server)"),
                Err(e) => {
                    eprintln!("connection error: {e}");
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut printer => {
                println!("Disconnected by server.");
                return Ok(());
            }
            line = stdin.next_line() => {
                let Some(line) = line? else { break };
                let exit = line == EXIT_COMMAND;
                outgoing.send(line).await?;
                if exit {
                    break;
                }
            }
        }
    }

    SinkExt::<String>::close(&mut outgoing).await?;
    // Let the server's last lines arrive before exiting.
    if tokio::time::timeout(LINGER, &mut printer).await.is_err() {
        printer.abort();
    }
    Ok(())
}
