//! Typed - 型付き Case API
//!
//! 文字列キーの typo を型で排除し、payload のデコードを Handler の手前で行います。
//!
//! # 二層構造
//! - **表層（Typed）**: `Case` trait, `TypedCase<T, F>` - 型安全
//! - **内部（Dyn）**: `CaseHandler<R>` trait - object-safe, type erasure
//!
//! Rust の enum を直接扱えるなら、ネイティブの `match` を使うのが最善です。
//! この層は subject が JSON として届く境界（設定ファイル、メッセージなど）向けです。

pub mod case;
pub mod handler;

pub use self::case::Case;
pub use self::handler::TypedCase;
