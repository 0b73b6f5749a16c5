//! ブラウザセッションの抽象化
//!
//! 要素はハンドルを持ち回らず、毎回セレクタから引き直す（遷移のたびに無効になるため）。
//! テストではこのトレイトを実装した偽セッションに差し替える。

mod chrome;

pub use chrome::ChromeSession;

use crate::error::Result;

/// 検索時点での要素情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// 同じセレクタにマッチした要素の中での位置
    pub index: usize,
    pub text: String,
}

pub trait Session {
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// トップレベル文書に戻る
    fn switch_to_default(&mut self) -> Result<()>;

    /// セレクタに一致するフレームに入る。まだ存在しなければ `Ok(false)`
    fn switch_to_frame(&mut self, frame_selector: &str) -> Result<bool>;

    /// 現在のコンテキスト内で要素を検索
    fn find_elements(&mut self, selector: &str) -> Result<Vec<ElementInfo>>;

    /// `nth` 番目の要素をスクロールしてからクリック（JSでディスパッチ）
    fn click(&mut self, selector: &str, nth: usize) -> Result<()>;

    /// セレクトボックスの選択を変更し change イベントを発火
    fn select_option(&mut self, select_selector: &str, index: usize) -> Result<()>;

    /// 履歴を1つ戻る（コンテキストはトップレベルに戻る）
    fn go_back(&mut self) -> Result<()>;

    /// 現在のコンテキストのHTML
    fn page_source(&mut self) -> Result<String>;
}
