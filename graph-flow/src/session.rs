use crate::context::Context;

/// One run through a graph.
///
/// Sessions are created by the caller for a single execution and dropped with
/// it; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub graph_id: String,
    pub current_task_id: String,
    pub status_message: Option<String>,
    pub context: Context,
}

impl Session {
    pub fn new_from_task(sid: String, task_name: &str) -> Self {
        Self {
            id: sid,
            graph_id: "default".to_string(),
            current_task_id: task_name.to_string(),
            status_message: None,
            context: Context::new(),
        }
    }

    /// Start a session at the graph's start task
    pub fn for_graph(sid: String, graph: &crate::Graph) -> crate::Result<Self> {
        let start = graph
            .start_task_id()
            .ok_or_else(|| crate::GraphError::MissingStartTask(graph.id.clone()))?;
        let mut session = Self::new_from_task(sid, &start);
        session.graph_id = graph.id.clone();
        Ok(session)
    }
}
