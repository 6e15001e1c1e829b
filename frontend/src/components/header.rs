use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-scale-balanced"></i> {" Text Classification Comparison"}</h1>
            <p class="subtitle">{"Naive Bayes, SVM and Random Forest on the same document"}</p>
        </header>
    }
}
