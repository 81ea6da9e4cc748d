//! Hero section component: title and export instructions

use leptos::*;

/// Steps in 給与R4 that produce the file this tool expects.
pub const EXPORT_STEPS: [&str; 4] = [
    "02.「設定」→24.「従業員/一覧入力」を選択",
    "Excel(F12)を選択→「はい」をクリック",
    "ファイルの種類を(*.xlsx)に変更して保存",
    "下部の指定場所にアップロード",
];

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"給与R4→Mykomon"</h1>
            <ol class="instructions">
                {EXPORT_STEPS
                    .iter()
                    .map(|step| view! { <li>{*step}</li> })
                    .collect_view()}
            </ol>
        </div>
    }
}
