//! Concurrency stress: K clients exchanging M messages each.

mod common;

use chitthi::config::DuplicatePolicy;
use common::TestServer;
use std::sync::Arc;

const CLIENTS: usize = 8;
const MESSAGES: usize = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ring_of_clients_no_misdelivery() {
    let server = Arc::new(TestServer::spawn(DuplicatePolicy::Reject).await.unwrap());

    let mut clients = Vec::with_capacity(CLIENTS);
    for i in 0..CLIENTS {
        clients.push(server.login(&format!("user{i}")).await.unwrap());
    }
    assert_eq!(server.registry().len(), CLIENTS);

    let mut tasks = Vec::with_capacity(CLIENTS);
    for (i, mut client) in clients.into_iter().enumerate() {
        tasks.push(tokio::spawn(async move {
            let next = (i + 1) % CLIENTS;
            let prev = (i + CLIENTS - 1) % CLIENTS;
            for j in 0..MESSAGES {
                client.send_line(&format!("user{next} {i}:{j}")).await?;
            }

            let lines = client.recv_n(2 * MESSAGES).await?;
            let echoes: Vec<&String> = lines.iter().filter(|l| l.starts_with("[You]")).collect();
            let incoming: Vec<&String> = lines
                .iter()
                .filter(|l| l.starts_with("[Message from"))
                .collect();

            let expected_echoes: Vec<String> = (0..MESSAGES)
                .map(|j| format!("[You] to [user{next}]: {i}:{j}"))
                .collect();
            let expected_incoming: Vec<String> = (0..MESSAGES)
                .map(|j| format!("[Message from user{prev}]: {prev}:{j}"))
                .collect();
            anyhow::ensure!(echoes == expected_echoes.iter().collect::<Vec<_>>());
            anyhow::ensure!(incoming == expected_incoming.iter().collect::<Vec<_>>());

            client.send_line("/exit").await?;
            client.expect_closed().await?;
            anyhow::Ok(())
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
        assert!(server.registry().len() <= CLIENTS);
    }
    server.wait_for(|r| r.is_empty()).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_claims_single_owner() {
    let server = Arc::new(TestServer::spawn(DuplicatePolicy::Reject).await.unwrap());

    let mut tasks = Vec::new();
    for _ in 0..CLIENTS {
        let address = server.address().to_string();
        tasks.push(tokio::spawn(async move {
            let mut client = common::TestClient::connect(&address).await?;
            client.send_line("same").await?;
            anyhow::Ok(client)
        }));
    }

    let mut clients = Vec::new();
    for task in tasks {
        clients.push(task.await.unwrap().unwrap());
    }
    server.wait_for(|r| r.contains("same")).await.unwrap();

    let mut rejected = 0;
    for client in &mut clients {
        let lines = client
            .recv_timeout(std::time::Duration::from_millis(500))
            .await;
        if let Ok(line) = lines {
            assert_eq!(line, "ERROR: Username same is already taken.");
            rejected += 1;
        }
    }
    assert_eq!(rejected, CLIENTS - 1);
    assert_eq!(server.registry().len(), 1);
}
