use cloner_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn exports_before_ready_are_ignored() {
    for msg in [
        Msg::ExportHtmlClicked,
        Msg::ExportArchiveClicked,
        Msg::CopyCodeClicked,
    ] {
        let state = AppState::new();
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}
