//! End-to-end delivery scenarios against the recording backend.
//!
//! Each test builds its own deliverer and inspects the exact sequence of
//! clipboard writes and key scripts that reached the backend.

use std::sync::Arc;

use vox_core::config::{VoxConfig, DEFAULT_ENTER_CONFIRM_APP_ID, DEFAULT_TAB_CONFIRM_APP_ID};
use vox_core::error::VoxError;
use vox_core::types::{DeliveryOptions, ProtocolKind};
use vox_delivery::{
    segment, BackendCall, ConfirmKey, Deliverer, DeliveryState, KeyScript, RecordingBackend,
};

// =============================================================================
// Helpers
// =============================================================================

fn make_deliverer(config: &VoxConfig) -> (Deliverer, RecordingBackend) {
    let backend = RecordingBackend::new();
    (Deliverer::new(backend.clone(), config), backend)
}

fn header_options(target: Option<&str>) -> DeliveryOptions {
    let opts = DeliveryOptions::new(true).with_file_references(["header.tsx"]);
    match target {
        Some(t) => opts.with_target_app(t),
        None => opts,
    }
}

fn clip(text: &str) -> BackendCall {
    BackendCall::Clipboard(text.to_string())
}

fn keys(script: KeyScript) -> BackendCall {
    BackendCall::Keys(script)
}

fn typed(text: &str) -> BackendCall {
    BackendCall::Keys(KeyScript::Type(text.to_string()))
}

// =============================================================================
// Protocol selection
// =============================================================================

#[tokio::test(start_paused = true)]
async fn clipboard_only_ignores_references_and_target() {
    for target in [
        Some(DEFAULT_ENTER_CONFIRM_APP_ID),
        Some(DEFAULT_TAB_CONFIRM_APP_ID),
        Some("com.apple.Notes"),
        None,
    ] {
        let (d, backend) = make_deliverer(&VoxConfig::default());
        let mut opts = header_options(target);
        opts.auto_paste = false;

        d.deliver("check header.tsx please", &opts).await.unwrap();

        assert_eq!(backend.calls(), vec![clip("check header.tsx please")]);
    }
}

#[tokio::test(start_paused = true)]
async fn empty_text_clipboard_only_writes_once() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    let mut opts = header_options(Some(DEFAULT_ENTER_CONFIRM_APP_ID));
    opts.auto_paste = false;

    d.deliver("", &opts).await.unwrap();

    assert_eq!(backend.calls(), vec![clip("")]);
    assert!(backend.key_scripts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unrecognized_target_gets_single_paste() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    d.deliver(
        "check header.tsx please",
        &header_options(Some("com.apple.TextEdit")),
    )
    .await
    .unwrap();

    assert_eq!(
        backend.calls(),
        vec![clip("check header.tsx please"), keys(KeyScript::PasteChord)]
    );
}

#[tokio::test(start_paused = true)]
async fn generic_scenario_has_no_trigger_characters() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    d.deliver("Call me later", &DeliveryOptions::new(true))
        .await
        .unwrap();

    assert_eq!(backend.clipboard_writes(), vec!["Call me later"]);
    assert_eq!(backend.key_scripts(), vec![KeyScript::PasteChord]);
}

// =============================================================================
// Mention protocols
// =============================================================================

#[tokio::test(start_paused = true)]
async fn enter_confirm_family_pastes_filename_and_confirms_with_return() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    d.deliver(
        "check header.tsx please",
        &header_options(Some(DEFAULT_ENTER_CONFIRM_APP_ID)),
    )
    .await
    .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            clip("check "),
            keys(KeyScript::PasteChord),
            typed("@"),
            clip("header.tsx"),
            keys(KeyScript::PasteChord),
            keys(KeyScript::Confirm(ConfirmKey::Primary)),
            clip(" please"),
            keys(KeyScript::PasteChord),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn tab_confirm_family_types_filename_and_confirms_with_tab() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    d.deliver(
        "check header.tsx please",
        &header_options(Some(DEFAULT_TAB_CONFIRM_APP_ID)),
    )
    .await
    .unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            clip("check "),
            keys(KeyScript::PasteChord),
            typed("#"),
            typed("header.tsx"),
            keys(KeyScript::Confirm(ConfirmKey::Secondary)),
            clip(" please"),
            keys(KeyScript::PasteChord),
        ]
    );
    assert!(!backend.clipboard_writes().contains(&"header.tsx".to_string()));
}

#[tokio::test(start_paused = true)]
async fn mention_uses_reference_casing_and_longest_match() {
    let (d, backend) = make_deliverer(&VoxConfig::default());
    let opts = DeliveryOptions::new(true)
        .with_file_references(["config.ts", "Auth.Config.ts"])
        .with_target_app(DEFAULT_ENTER_CONFIRM_APP_ID);

    d.deliver("edit auth.config.ts now", &opts).await.unwrap();

    assert_eq!(
        backend.clipboard_writes(),
        vec!["edit ", "Auth.Config.ts", " now"]
    );
}

#[tokio::test(start_paused = true)]
async fn disabled_tagging_falls_back_to_generic() {
    let mut config = VoxConfig::default();
    config.editors.tab_confirm_tagging = false;
    let (d, backend) = make_deliverer(&config);

    let plan = d.plan(
        "check header.tsx please",
        &header_options(Some(DEFAULT_TAB_CONFIRM_APP_ID)),
    );
    assert_eq!(plan.protocol, ProtocolKind::GenericPaste);

    d.deliver(
        "check header.tsx please",
        &header_options(Some(DEFAULT_TAB_CONFIRM_APP_ID)),
    )
    .await
    .unwrap();
    assert_eq!(
        backend.calls(),
        vec![clip("check header.tsx please"), keys(KeyScript::PasteChord)]
    );
}

#[tokio::test(start_paused = true)]
async fn custom_editor_identifiers_are_honoured() {
    let mut config = VoxConfig::default();
    config.editors.enter_confirm_app_id = "dev.example.Editor".to_string();
    let (d, _) = make_deliverer(&config);

    let plan = d.plan(
        "check header.tsx please",
        &header_options(Some("dev.example.Editor")),
    );
    assert_eq!(plan.protocol, ProtocolKind::MentionWithEnterConfirm);

    let plan = d.plan(
        "check header.tsx please",
        &header_options(Some(DEFAULT_ENTER_CONFIRM_APP_ID)),
    );
    assert_eq!(plan.protocol, ProtocolKind::GenericPaste);
}

// =============================================================================
// Failures and concurrency
// =============================================================================

#[tokio::test(start_paused = true)]
async fn launch_failure_leaves_partial_delivery() {
    // Call 5 is the primary confirm key.
    let backend = RecordingBackend::new().with_launch_failure_at(5);
    let d = Deliverer::new(backend.clone(), &VoxConfig::default());

    let result = d
        .deliver(
            "check header.tsx please",
            &header_options(Some(DEFAULT_ENTER_CONFIRM_APP_ID)),
        )
        .await;

    assert!(matches!(result, Err(VoxError::Launch { .. })));
    assert_eq!(
        backend.calls(),
        vec![
            clip("check "),
            keys(KeyScript::PasteChord),
            typed("@"),
            clip("header.tsx"),
            keys(KeyScript::PasteChord),
        ]
    );
    assert_eq!(d.state(), DeliveryState::Idle);

    // The deliverer is usable again after an aborted call.
    d.deliver("again", &DeliveryOptions::new(false)).await.unwrap();
    assert_eq!(backend.clipboard_writes().last().map(String::as_str), Some("again"));
}

#[tokio::test(start_paused = true)]
async fn overlapping_delivery_is_rejected() {
    let backend = RecordingBackend::new();
    let d = Arc::new(Deliverer::new(backend.clone(), &VoxConfig::default()));

    let first = {
        let d = Arc::clone(&d);
        tokio::spawn(async move {
            d.deliver(
                "check header.tsx please",
                &header_options(Some(DEFAULT_ENTER_CONFIRM_APP_ID)),
            )
            .await
        })
    };

    while d.state() != DeliveryState::Delivering {
        tokio::task::yield_now().await;
    }

    let second = d
        .deliver("Call me later", &DeliveryOptions::new(true))
        .await;
    assert!(matches!(second, Err(VoxError::DeliveryInFlight)));

    first.await.unwrap().unwrap();
    assert!(!backend
        .clipboard_writes()
        .contains(&"Call me later".to_string()));
    assert_eq!(d.state(), DeliveryState::Idle);
}

// =============================================================================
// Segmentation properties
// =============================================================================

#[test]
fn round_trip_over_varied_inputs() {
    let texts = [
        "",
        "plain",
        "open main.rs and lib.rs then Cargo.toml",
        "main.rsmain.rs",
        "  spaced   main.rs  ",
        "日本語 main.rs テキスト",
    ];
    let references: Vec<String> = ["main.rs", "lib.rs", "Cargo.toml", "rs"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    for text in texts {
        for n in 0..=references.len() {
            let segments = segment(text, &references[..n]);
            let joined: String = segments.iter().map(|s| s.value.as_str()).collect();
            assert_eq!(joined, text, "round trip failed for {text:?} with {n} refs");
        }
    }
}
