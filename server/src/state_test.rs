use super::*;

#[tokio::test]
async fn test_app_state_has_temp_data_dir() {
    let state = test_helpers::test_app_state();
    assert!(state.data_dir.ends_with("matboard-test"));
}

#[tokio::test]
async fn app_state_is_cloneable() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    assert_eq!(state.data_dir, clone.data_dir);
}
