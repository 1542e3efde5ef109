use std::sync::Arc;
use std::time::Duration;

use chatlog_persist::import::{bucket_date, to_flat_conversation, FLAT_MODEL, UNKNOWN_MODEL};
use chatlog_persist::{ImportError, ImportOptions, MemoryStore, PersistClient};
use chatlog_types::ConversationEntry;
use chrono::{TimeZone, Utc};
use serde_json::json;

// 2024-03-01T12:00:00Z
const CREATED: f64 = 1709294400.0;

fn client() -> PersistClient {
    PersistClient::new(Arc::new(MemoryStore::new()))
}

fn options(chunk_size: i64) -> ImportOptions {
    ImportOptions::new(chunk_size).with_pause(Duration::ZERO)
}

fn created_day() -> String {
    bucket_date(Utc.timestamp_opt(CREATED as i64, 0).unwrap())
}

#[tokio::test]
async fn test_flat_pair_becomes_one_entry() {
    let client = client();
    let export = json!([{
        "title": "Greeting",
        "create_time": CREATED,
        "messages": [
            {"role": "user", "content": "A"},
            {"role": "assistant", "content": "B"}
        ]
    }]);

    let report = client
        .importer(options(10))
        .run(&export.to_string())
        .await
        .unwrap();

    assert_eq!(report.conversations_processed, 1);
    assert_eq!(report.conversations_with_entries, 1);
    assert_eq!(report.entries_imported, 1);

    let log = client.history().get(&created_day());
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].prompt, "A");
    assert_eq!(log[0].response, "B");
    assert_eq!(log[0].model, FLAT_MODEL);
}

#[tokio::test]
async fn test_trailing_user_message_dropped() {
    let client = client();
    let export = json!({"conversations": [{
        "create_time": CREATED,
        "messages": [
            {"role": "user", "content": "A"},
            {"role": "assistant", "content": "B"},
            {"role": "user", "content": "unanswered"}
        ]
    }]});

    let report = client
        .importer(options(10))
        .run(&export.to_string())
        .await
        .unwrap();

    assert_eq!(report.entries_imported, 1);
    assert_eq!(client.history().get(&created_day()).len(), 1);
}

#[tokio::test]
async fn test_tree_pairs_follow_parent_links() {
    let client = client();
    let export = json!([{
        "create_time": CREATED,
        "mapping": {
            "root": {"id": "root", "message": null, "parent": null},
            "u1": {
                "id": "u1",
                "parent": "root",
                "message": {"author": {"role": "user"}, "content": {"parts": ["Hello", "there"]}}
            },
            "a1": {
                "id": "a1",
                "parent": "u1",
                "message": {
                    "author": {"role": "assistant"},
                    "content": {"parts": ["Hi"]},
                    "metadata": {"model_slug": "gpt-4"}
                }
            },
            "u2": {
                "id": "u2",
                "parent": "a1",
                "message": {"author": {"role": "user"}, "content": {"parts": ["Bye"]}}
            },
            "a2": {
                "id": "a2",
                "parent": "u2",
                "message": {"author": {"role": "assistant"}, "content": {"parts": ["Later"]}}
            }
        }
    }]);

    client
        .importer(options(10))
        .run(&export.to_string())
        .await
        .unwrap();

    let log = client.history().get(&created_day());
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].prompt, "Hello\nthere");
    assert_eq!(log[0].response, "Hi");
    assert_eq!(log[0].model, "gpt-4");
    assert_eq!(log[1].model, UNKNOWN_MODEL);
}

#[tokio::test]
async fn test_unanswered_tree_node_yields_nothing() {
    let client = client();
    let export = json!({
        "create_time": CREATED,
        "mapping": {
            "u1": {
                "id": "u1",
                "message": {"author": {"role": "user"}, "content": {"parts": ["anyone?"]}}
            }
        }
    });

    let report = client
        .importer(options(10))
        .run(&export.to_string())
        .await
        .unwrap();

    assert_eq!(report.conversations_processed, 1);
    assert_eq!(report.conversations_with_entries, 0);
    assert!(client.history().dates().is_empty());
}

#[tokio::test]
async fn test_merges_onto_existing_day() {
    let client = client();
    let day = created_day();
    client
        .history()
        .append(&day, ConversationEntry::new(Utc::now(), "earlier", "reply", "gpt-4"))
        .unwrap();

    let export = json!([{
        "create_time": CREATED,
        "messages": [
            {"role": "user", "content": "A"},
            {"role": "assistant", "content": "B"}
        ]
    }]);
    client
        .importer(options(10))
        .run(&export.to_string())
        .await
        .unwrap();

    let log = client.history().get(&day);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].prompt, "earlier");
    assert_eq!(log[1].prompt, "A");
}

#[tokio::test]
async fn test_bad_conversation_skipped_and_counted() {
    let client = client();
    let export = json!([
        {"title": "no body"},
        {"mapping": {"x": "not a node"}},
        {
            "create_time": CREATED,
            "messages": [
                {"role": "user", "content": "A"},
                {"role": "assistant", "content": "B"}
            ]
        }
    ]);

    let report = client
        .importer(options(1))
        .run(&export.to_string())
        .await
        .unwrap();

    assert_eq!(report.conversations_processed, 3);
    assert_eq!(report.conversations_failed, 2);
    assert_eq!(report.entries_imported, 1);
}

fn numbered_export(count: usize) -> String {
    let conversations: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "create_time": CREATED,
                "messages": [
                    {"role": "user", "content": format!("q{i}")},
                    {"role": "assistant", "content": format!("a{i}")}
                ]
            })
        })
        .collect();
    serde_json::Value::Array(conversations).to_string()
}

#[tokio::test]
async fn test_every_conversation_processed_across_batches() {
    let client = client();

    let report = client
        .importer(options(3))
        .run(&numbered_export(7))
        .await
        .unwrap();

    assert_eq!(report.conversations_processed, 7);
    assert_eq!(report.entries_imported, 7);

    let prompts: Vec<_> = client
        .history()
        .get(&created_day())
        .into_iter()
        .map(|e| e.prompt)
        .collect();
    assert_eq!(prompts, ["q0", "q1", "q2", "q3", "q4", "q5", "q6"]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_only_between_batches() {
    let client = client();
    let pause = Duration::from_millis(250);
    let importer = client.importer(ImportOptions::new(3).with_pause(pause));

    // 7 conversations in batches of 3: two gaps, none after the last batch.
    let started = tokio::time::Instant::now();
    let report = importer.run(&numbered_export(7)).await.unwrap();
    assert_eq!(report.conversations_processed, 7);
    let elapsed = started.elapsed();
    assert!(elapsed >= pause * 2 && elapsed < pause * 3, "{elapsed:?}");

    // A single batch never sleeps.
    let started = tokio::time::Instant::now();
    importer.run(&numbered_export(3)).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_whole_file_errors() {
    let client = client();
    let importer = client.importer(options(10));

    assert!(matches!(
        importer.run("not json").await,
        Err(ImportError::InvalidJson(_))
    ));
    assert!(matches!(
        importer.run(r#"{"title": "x"}"#).await,
        Err(ImportError::UnrecognizedFormat)
    ));
    assert!(matches!(
        importer.run("42").await,
        Err(ImportError::UnrecognizedFormat)
    ));
    assert!(matches!(importer.run("[]").await, Err(ImportError::Empty)));
    assert!(matches!(
        importer.run(r#"{"conversations": []}"#).await,
        Err(ImportError::Empty)
    ));
}

#[tokio::test]
async fn test_exported_day_reimports() {
    let source = client();
    let day = created_day();
    let created = Utc.timestamp_opt(CREATED as i64, 0).unwrap();
    source
        .history()
        .append(&day, ConversationEntry::new(created, "first", "one", "gpt-4"))
        .unwrap();
    source
        .history()
        .append(&day, ConversationEntry::new(created, "second", "two", "gpt-4"))
        .unwrap();

    let exported = json!([to_flat_conversation(&day, &source.history().get(&day))]);

    let target = client();
    target
        .importer(options(10))
        .run(&exported.to_string())
        .await
        .unwrap();

    let log = target.history().get(&day);
    let pairs: Vec<_> = log
        .iter()
        .map(|e| (e.prompt.as_str(), e.response.as_str()))
        .collect();
    assert_eq!(pairs, [("first", "one"), ("second", "two")]);
    assert!(log.iter().all(|e| e.model == FLAT_MODEL));
}
