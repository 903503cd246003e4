//! Case trait - case key と payload 型の対応付け

use serde::de::DeserializeOwned;

/// Case は case key と payload 型を対応付ける
///
/// # 使用例
/// ```ignore
/// #[derive(Deserialize)]
/// struct Charged {
///     amount: u64,
/// }
///
/// impl Case for Charged {
///     const KEY: &'static str = "charged";
/// }
/// ```
///
/// # Trait Bounds
/// - `DeserializeOwned`: subject の payload (`serde_json::Value`) からの復元
/// - `Send + Sync + 'static`: `Arc<dyn CaseHandler<R>>` に格納するため
pub trait Case: DeserializeOwned + Send + Sync + 'static {
    const KEY: &'static str;
}
