//! Integration tests for the batch supervisor

#[cfg(test)]
mod tests {
    use crate::{EventSink, IntakeController, IntakeError, IntakeEvent};
    use lexintake_assistant::MockAssistant;
    use lexintake_domain::batch::BatchState;
    use lexintake_domain::record::{DocumentRecord, FieldSet, RecordSet};
    use lexintake_extractor::{ExtractionClient, ExtractorConfig};
    use lexintake_store::{MemoryBlobStore, MemoryStore};
    use std::sync::Arc;

    const REPLY: &str = "<contractTitle>MSA</contractTitle>";

    fn controller(
        assistant: MockAssistant,
        store: MemoryStore,
    ) -> IntakeController<MockAssistant, MemoryStore> {
        IntakeController::new(
            ExtractionClient::new(assistant, ExtractorConfig::default()),
            store,
        )
    }

    fn files(names: &[&str]) -> Vec<(String, Vec<u8>)> {
        names.iter().map(|n| (n.to_string(), vec![1u8])).collect()
    }

    fn stored_set(filenames: &[&str]) -> RecordSet {
        let mut set = RecordSet::new();
        for name in filenames {
            let mut fields = FieldSet::new();
            fields.insert("contractTitle", "existing");
            set.merge_batch(vec![DocumentRecord::new(*name, fields)], vec![]);
        }
        set
    }

    #[tokio::test]
    async fn test_batch_persists_records_and_seeds_columns() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::new();
        let ctrl = controller(assistant.clone(), store.clone());

        let report = ctrl.upload_batch(files(&["a.pdf", "b.pdf"])).await.unwrap();

        assert_eq!(report.state, BatchState::Completed);
        assert_eq!(report.progress.to_string(), "2/2");
        assert!(report.error.is_none());
        assert_eq!(report.set.documents.len(), 2);
        assert_eq!(report.set.column_order, vec!["filename", "contractTitle"]);
        assert_eq!(report.set.external_info.len(), 2);
        assert!(report.set.external_info[0].file_id.starts_with("file-"));

        // Saved once and read back: initial load plus the post-save reload
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 2);
        assert_eq!(store.snapshot().unwrap(), report.set);
    }

    #[tokio::test]
    async fn test_duplicate_filenames_skipped() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::with_collection(stored_set(&["a.pdf"]));
        let ctrl = controller(assistant.clone(), store.clone());

        let report = ctrl.upload_batch(files(&["a.pdf", "b.pdf"])).await.unwrap();

        assert_eq!(report.state, BatchState::Completed);
        assert_eq!(report.skipped, vec!["a.pdf"]);
        // Skips never advance the completed counter
        assert_eq!(report.progress.to_string(), "1/2");
        assert_eq!(report.set.documents.len(), 2);
        assert_eq!(assistant.counts().uploads, 1);
    }

    #[tokio::test]
    async fn test_failure_halts_and_keeps_earlier_files() {
        let assistant = MockAssistant::new(REPLY);
        assistant.fail_upload("b.pdf");
        let store = MemoryStore::new();
        let ctrl = controller(assistant.clone(), store.clone());

        let report = ctrl
            .upload_batch(files(&["a.pdf", "b.pdf", "c.pdf"]))
            .await
            .unwrap();

        assert_eq!(report.state, BatchState::Failed);
        assert!(matches!(
            report.error,
            Some(IntakeError::Extraction { ref filename, .. }) if filename == "b.pdf"
        ));
        // a.pdf was kept and persisted; c.pdf was never attempted
        assert_eq!(report.set.documents.len(), 1);
        assert_eq!(report.set.documents[0].filename, "a.pdf");
        assert_eq!(assistant.counts().uploads, 2);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_keeps_completed_files() {
        let assistant = MockAssistant::new(REPLY);
        // First file completes on its first poll, the second hangs
        assistant.push_run_status("completed");
        for _ in 0..50 {
            assistant.push_run_status("in_progress");
        }
        let store = MemoryStore::new();
        let ctrl = Arc::new(controller(assistant.clone(), store.clone()));

        let task = {
            let ctrl = Arc::clone(&ctrl);
            tokio::spawn(async move { ctrl.upload_batch(files(&["a.pdf", "b.pdf"])).await })
        };

        // Wait for the second file's first poll, then cancel
        while assistant.counts().polls < 2 {
            tokio::task::yield_now().await;
        }
        ctrl.cancel();

        let report = task.await.unwrap().unwrap();
        assert_eq!(report.state, BatchState::Cancelled);
        assert!(report.error.is_none());
        assert_eq!(report.set.documents.len(), 1);
        assert_eq!(report.set.documents[0].filename, "a.pdf");
        // Results were persisted despite the cancellation
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_batch_rejected_while_running() {
        let assistant = MockAssistant::new(REPLY);
        for _ in 0..50 {
            assistant.push_run_status("in_progress");
        }
        let ctrl = Arc::new(controller(assistant.clone(), MemoryStore::new()));

        let task = {
            let ctrl = Arc::clone(&ctrl);
            tokio::spawn(async move { ctrl.upload_batch(files(&["a.pdf"])).await })
        };

        while assistant.counts().polls < 1 {
            tokio::task::yield_now().await;
        }
        assert_eq!(ctrl.state(), BatchState::Running);
        assert!(matches!(
            ctrl.upload_batch(files(&["b.pdf"])).await,
            Err(IntakeError::BatchActive)
        ));

        ctrl.cancel();
        let report = task.await.unwrap().unwrap();
        assert_eq!(report.state, BatchState::Cancelled);
    }

    #[tokio::test]
    async fn test_column_order_survives_later_batches() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::new();
        let ctrl = controller(assistant.clone(), store.clone());

        ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();

        // A later batch discovering a new field must not reorder columns
        assistant.push_reply(
            "<contractTitle>NDA</contractTitle><jurisdiction>NY</jurisdiction>",
        );
        let report = ctrl.upload_batch(files(&["b.pdf"])).await.unwrap();

        assert_eq!(report.set.column_order, vec!["filename", "contractTitle"]);
        assert_eq!(
            report.set.documents[1].fields.get("jurisdiction"),
            Some("NY")
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_starts_from_empty_set() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let ctrl = controller(assistant, store.clone());

        let report = ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();

        // Load and reload both failed; the batch still ran to completion
        assert_eq!(report.state, BatchState::Completed);
        assert_eq!(report.set.documents.len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_reported_after_completed_batch() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::new();
        store.fail_writes(true);
        let ctrl = controller(assistant, store.clone());

        let report = ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();

        assert_eq!(report.state, BatchState::Failed);
        assert!(matches!(report.error, Some(IntakeError::StoreSave(_))));
        // The in-memory result is still reported
        assert_eq!(report.set.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_blob_store_records_download_urls() {
        let assistant = MockAssistant::new(REPLY);
        let blobs = MemoryBlobStore::new();
        let ctrl = IntakeController::with_blob_store(
            ExtractionClient::new(assistant, ExtractorConfig::default()),
            MemoryStore::new(),
            blobs.clone(),
        );

        let report = ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();

        assert_eq!(
            report.set.external_info[0].download_url.as_deref(),
            Some("memory://files/a.pdf")
        );
        assert_eq!(blobs.uploaded(), vec!["a.pdf"]);
    }

    #[tokio::test]
    async fn test_blob_failure_fails_batch_before_extraction() {
        let assistant = MockAssistant::new(REPLY);
        let blobs = MemoryBlobStore::new();
        blobs.fail_uploads(true);
        let ctrl = IntakeController::with_blob_store(
            ExtractionClient::new(assistant.clone(), ExtractorConfig::default()),
            MemoryStore::new(),
            blobs,
        );

        let report = ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();

        assert_eq!(report.state, BatchState::Failed);
        assert!(matches!(report.error, Some(IntakeError::Blob { .. })));
        assert!(report.set.documents.is_empty());
        // Blob upload runs first, so no assistant resources were consumed
        assert_eq!(assistant.counts().uploads, 0);
    }

    #[tokio::test]
    async fn test_event_stream_for_mixed_batch() {
        let assistant = MockAssistant::new(REPLY);
        let store = MemoryStore::with_collection(stored_set(&["a.pdf"]));
        let (sink, mut rx) = EventSink::channel();
        let ctrl = IntakeController::new(
            ExtractionClient::new(assistant, ExtractorConfig::default()),
            store,
        )
        .with_events(sink);

        ctrl.upload_batch(files(&["a.pdf", "b.pdf"])).await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], IntakeEvent::BatchStarted { total: 2, .. }));
        assert!(matches!(
            events[1],
            IntakeEvent::FileSkipped { ref filename } if filename == "a.pdf"
        ));
        assert!(matches!(
            events[2],
            IntakeEvent::FileStarted { ref filename } if filename == "b.pdf"
        ));
        assert!(matches!(events[3], IntakeEvent::FileCompleted { .. }));
        assert!(matches!(
            events[4],
            IntakeEvent::BatchFinished {
                state: BatchState::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_move_column_persists_new_order() {
        let assistant = MockAssistant::new(REPLY);
        let mut set = stored_set(&["a.pdf"]);
        set.column_order = vec!["filename".into(), "contractTitle".into(), "x".into()];
        let store = MemoryStore::with_collection(set);
        let ctrl = controller(assistant, store.clone());

        let updated = ctrl.move_column(2, 0).await.unwrap();
        assert_eq!(updated.column_order, vec!["x", "filename", "contractTitle"]);
        assert_eq!(store.save_count(), 1);

        // Out-of-range moves change nothing and skip the save
        let unchanged = ctrl.move_column(9, 0).await.unwrap();
        assert_eq!(unchanged.column_order, updated.column_order);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_acknowledge_returns_to_idle() {
        let ctrl = controller(MockAssistant::new(REPLY), MemoryStore::new());
        assert_eq!(ctrl.state(), BatchState::Idle);

        ctrl.upload_batch(files(&["a.pdf"])).await.unwrap();
        assert_eq!(ctrl.state(), BatchState::Completed);

        ctrl.acknowledge();
        assert_eq!(ctrl.state(), BatchState::Idle);
    }

    #[tokio::test]
    async fn test_chat_shares_the_configured_assistant() {
        let assistant = MockAssistant::new("the renewal date is 2025-01-01");
        let ctrl = controller(assistant.clone(), MemoryStore::new());

        let mut session = ctrl.chat();
        let answer = session
            .ask("when does it renew?", &ctrl.cancel_flag())
            .await
            .unwrap();
        assert_eq!(answer, "the renewal date is 2025-01-01");
        assert_eq!(assistant.counts().threads, 1);
    }
}
