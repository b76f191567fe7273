use booklet_core::Margins;
use booklet_runtime::*;
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::Path;
use tokio::sync::mpsc;

fn write_test_pdf(num_pages: usize, path: &Path) {
    build_test_pdf(num_pages).save(path).unwrap();
}

fn build_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 72 Td (Page {}) Tj ET", page + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(420),
                    Object::Integer(595),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Queue every command, close the channel and run the worker to completion
async fn run_commands(commands: Vec<BookletCommand>) -> Vec<BookletUpdate> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    for cmd in commands {
        command_tx.send(cmd).unwrap();
    }
    drop(command_tx);

    worker_task(command_rx, update_tx).await;

    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn options_for(input: &Path) -> BookletOptions {
    BookletOptions {
        input_file: input.to_owned(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_generate_writes_booklet() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("zine.pdf");
    write_test_pdf(6, &input);

    let updates = run_commands(vec![BookletCommand::Generate {
        options: options_for(&input),
    }])
    .await;

    let progress: Vec<&String> = updates
        .iter()
        .filter_map(|update| match update {
            BookletUpdate::Progress { operation, .. } => Some(operation),
            _ => None,
        })
        .collect();
    assert_eq!(progress.len(), 4);
    assert_eq!(progress[0], "Output page 1/4 (input blank | 1)");
    assert_eq!(progress[3], "Output page 4/4 (input 4 | 5)");

    assert!(
        updates
            .iter()
            .any(|update| matches!(update, BookletUpdate::Status { .. }))
    );

    match updates.last() {
        Some(BookletUpdate::Complete { path, stats }) => {
            assert_eq!(path, &dir.path().join("zine_booklet_landscape.pdf"));
            assert_eq!(stats.blank_pages_added, 2);
            assert_eq!(stats.output_sheets, 2);

            let output = Document::load(path).unwrap();
            assert_eq!(output.get_pages().len(), 4);
        }
        other => panic!("Expected Complete, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_rejects_invalid_margins_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    write_test_pdf(4, &input);

    let options = BookletOptions {
        margins: Margins::new(10.0, -1.0),
        ..options_for(&input)
    };
    let output = options.output_path();

    let updates = run_commands(vec![BookletCommand::Generate { options }]).await;

    match updates.as_slice() {
        [BookletUpdate::Error { message }] => assert!(message.starts_with("Invalid options")),
        other => panic!("Unexpected updates: {:?}", other),
    }
    assert!(!output.exists());
}

#[tokio::test]
async fn test_generate_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.pdf");

    let updates = run_commands(vec![BookletCommand::Generate {
        options: options_for(&input),
    }])
    .await;

    let last = updates.last().unwrap();
    assert!(last.is_terminal());
    match last {
        BookletUpdate::Error { message } => assert!(message.starts_with("Failed to load PDF")),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_without_padding_fails_for_odd_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    write_test_pdf(5, &input);

    let options = BookletOptions {
        pad_to_multiple_of_4: false,
        ..options_for(&input)
    };
    let output = options.output_path();

    let updates = run_commands(vec![BookletCommand::Generate { options }]).await;

    assert!(matches!(updates.last(), Some(BookletUpdate::Error { .. })));
    assert!(
        !updates
            .iter()
            .any(|update| matches!(update, BookletUpdate::Progress { .. }))
    );
    assert!(!output.exists());
}

#[tokio::test]
async fn test_queued_stats_requests_keep_latest() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    write_test_pdf(10, &input);

    let updates = run_commands(vec![
        BookletCommand::CalculateStats {
            options: options_for(&dir.path().join("stale.pdf")),
        },
        BookletCommand::CalculateStats {
            options: options_for(&input),
        },
    ])
    .await;

    match updates.as_slice() {
        [BookletUpdate::StatsCalculated { stats }] => {
            assert_eq!(stats.source_pages, 10);
            assert_eq!(stats.effective_pages, 12);
        }
        other => panic!("Unexpected updates: {:?}", other),
    }
}

#[tokio::test]
async fn test_load_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("booklet.json");
    let saved = BookletOptions {
        input_file: "report.pdf".into(),
        margins: Margins::new(12.0, 4.0),
        ..Default::default()
    };
    saved.save(&config).await.unwrap();

    let updates = run_commands(vec![BookletCommand::LoadConfig { path: config }]).await;

    match updates.as_slice() {
        [BookletUpdate::ConfigLoaded { options }] => assert_eq!(options, &saved),
        other => panic!("Unexpected updates: {:?}", other),
    }
}

#[tokio::test]
async fn test_config_queued_behind_stats_is_answered_first() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    write_test_pdf(3, &input);
    let config = dir.path().join("booklet.json");
    options_for(&input).save(&config).await.unwrap();

    let updates = run_commands(vec![
        BookletCommand::CalculateStats {
            options: options_for(&dir.path().join("stale.pdf")),
        },
        BookletCommand::LoadConfig { path: config },
        BookletCommand::CalculateStats {
            options: options_for(&input),
        },
    ])
    .await;

    match updates.as_slice() {
        [
            BookletUpdate::ConfigLoaded { options },
            BookletUpdate::StatsCalculated { stats },
        ] => {
            assert_eq!(options.input_file, input);
            assert_eq!(stats.source_pages, 3);
        }
        other => panic!("Unexpected updates: {:?}", other),
    }
    assert!(updates.iter().all(BookletUpdate::is_terminal));
}

#[tokio::test]
async fn test_generate_warns_about_unreadable_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("damaged.pdf");
    let mut doc = build_test_pdf(4);
    let page_id = doc.get_pages()[&3];
    doc.get_dictionary_mut(page_id)
        .unwrap()
        .set("Contents", Object::Reference((9999, 0)));
    doc.save(&input).unwrap();

    let updates = run_commands(vec![BookletCommand::Generate {
        options: options_for(&input),
    }])
    .await;

    let warnings: Vec<&String> = updates
        .iter()
        .filter_map(|update| match update {
            BookletUpdate::Status { message } if message.starts_with("Warning") => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(
        warnings,
        vec!["Warning: page 3 could not be copied, drew a placeholder"]
    );

    match updates.last() {
        Some(BookletUpdate::Complete { path, .. }) => {
            let output = Document::load(path).unwrap();
            assert_eq!(output.get_pages().len(), 2);
        }
        other => panic!("Expected Complete, got {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_exits_when_senders_dropped() {
    let (command_tx, command_rx) = mpsc::unbounded_channel::<BookletCommand>();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(worker_task(command_rx, update_tx));
    drop(command_tx);

    handle.await.unwrap();
    assert!(update_rx.recv().await.is_none());
}
