use crate::agent::ChatModel;
use crate::models::{CompleteDocuments, GenerationVariant};
use crate::tasks::*;
use chrono::NaiveDate;
use graph_flow::{Graph, GraphBuilder, Session, Task};
use std::sync::Arc;

pub const WORKFLOW_ID: &str = "appeal_workflow";

/// One graph per run: the documents and the chat model belong to this request only.
///
/// extract_text → build_prompts → appeal_letter → medical_summary
///   → rebuttal_suggestions (full variant only) → present_results
pub fn build_appeal_workflow(
    documents: CompleteDocuments,
    model: Arc<dyn ChatModel>,
    today: NaiveDate,
) -> Graph {
    let extract_task = Arc::new(ExtractTextTask::new(documents));
    let extract_id = extract_task.id().to_string();

    let prompts_task = Arc::new(BuildPromptsTask::new(today));
    let prompts_id = prompts_task.id().to_string();

    let appeal_task = Arc::new(ChatStepTask::new(ChatStep::AppealLetter, model.clone()));
    let appeal_id = appeal_task.id().to_string();

    let summary_task = Arc::new(ChatStepTask::new(ChatStep::MedicalSummary, model.clone()));
    let summary_id = summary_task.id().to_string();

    let rebuttal_task = Arc::new(ChatStepTask::new(ChatStep::RebuttalSuggestions, model));
    let rebuttal_id = rebuttal_task.id().to_string();

    let present_task = Arc::new(PresentResultsTask);
    let present_id = present_task.id().to_string();

    GraphBuilder::new(WORKFLOW_ID)
        .add_task(extract_task)
        .add_task(prompts_task)
        .add_task(appeal_task)
        .add_task(summary_task)
        .add_task(rebuttal_task)
        .add_task(present_task)
        .add_edge(&extract_id, &prompts_id)
        .add_edge(&prompts_id, &appeal_id)
        .add_edge(&appeal_id, &summary_id)
        .add_conditional_edge(&summary_id, &rebuttal_id, |ctx| {
            ctx.get_sync::<GenerationVariant>(session_keys::VARIANT)
                .unwrap_or_default()
                .includes_rebuttal()
        })
        .add_edge(&summary_id, &present_id)
        .add_edge(&rebuttal_id, &present_id)
        .build()
}

/// Fresh session at the start of the graph, carrying the requested variant
pub async fn create_appeal_session(
    session_id: String,
    graph: &Graph,
    variant: GenerationVariant,
) -> graph_flow::Result<Session> {
    let session = Session::for_graph(session_id, graph)?;
    session.context.set(session_keys::VARIANT, variant).await;
    Ok(session)
}
