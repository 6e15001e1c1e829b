use super::super::{Model, Msg};
use super::utils::format_timestamp;
use shared::metrics::format_percent;
use shared::normalize::preview_text;
use shared::{ClassificationSession, HistoryRow};
use yew::prelude::*;

const ROW_PREVIEW_CHARS: usize = 150;

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    let history = model.assembler.history();
    let rows = model.assembler.history_rows();
    let link = ctx.link();

    html! {
        <section class="history-section">
            <div class="history-header">
                <h2><i class="fa-solid fa-clock-rotate-left"></i>{ format!(" History ({})", history.len()) }</h2>
                if !history.is_empty() {
                    <button class="secondary-btn" onclick={link.callback(|_| Msg::ClearHistory)}>
                        {"Clear history"}
                    </button>
                }
            </div>

            if !history.is_persistent() {
                <p class="history-warning">{"History could not be saved; it will be kept for this session only."}</p>
            }

            if history.is_empty() {
                <p class="no-results-message">{"No history yet. Classify a document to get started."}</p>
            } else {
                <ul class="history-list">
                    { for history.list().iter().zip(rows).map(|(session, row)| render_row(ctx, session, row)) }
                </ul>
            }
        </section>
    }
}

fn render_row(ctx: &Context<Model>, session: &ClassificationSession, row: HistoryRow) -> Html {
    let id = session.id;
    let replay = ctx.link().callback(move |_| Msg::ReplaySession(id));
    let delete = ctx.link().callback(move |e: MouseEvent| {
        e.stop_propagation();
        Msg::DeleteSession(id)
    });

    html! {
        <li class="history-item" onclick={replay} title="Show these results again">
            <div class="history-item-header">
                <span class="history-time">{ format_timestamp(session) }</span>
                <span class={classes!("badge", row.agreement.badge_class())}>{ row.agreement.to_string() }</span>
                <button class="delete-btn" onclick={delete} title="Delete from history">{"×"}</button>
            </div>
            <p class="history-preview">{ preview_text(&session.input_text_preview, ROW_PREVIEW_CHARS) }</p>
            <table class="history-results">
                <tbody>
                    { for session.results.iter().map(|(algorithm, result)| {
                        let top = row
                            .top_probabilities
                            .get(algorithm)
                            .iter()
                            .map(|score| format!("{}: {:.1}%", score.category, score.percent()))
                            .collect::<Vec<_>>()
                            .join(", ");
                        html! {
                            <tr>
                                <td>{ algorithm.display_name() }</td>
                                <td>{ &result.predicted_category }</td>
                                <td>{ format_percent(result.confidence) }</td>
                                <td>{ format!("{:.3} ms", result.prediction_time_ms) }</td>
                                <td class="history-top">{ top }</td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        </li>
    }
}
