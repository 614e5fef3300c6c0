use crate::graph::Graph;

/// Sink for undo records written around every structural mutation.
///
/// `record` is called with the graph as it was before the mutation and
/// `flush` once the mutation is complete. Implementations that only log
/// calls can leave `undo`/`redo` at their defaults.
pub trait UndoJournal {
    fn record(&mut self, graph: &Graph, label: &str);
    fn flush(&mut self);

    /// Returns the graph to restore, given the current one.
    fn undo(&mut self, _current: &Graph) -> Option<Graph> {
        None
    }

    fn redo(&mut self, _current: &Graph) -> Option<Graph> {
        None
    }
}

#[derive(Clone, Debug)]
pub struct UndoRecord {
    pub label: String,
    pub graph: Graph,
}

/// Snapshot-based undo history.
#[derive(Clone, Debug)]
pub struct UndoStack {
    undo: Vec<UndoRecord>,
    redo: Vec<UndoRecord>,
    pending: Option<UndoRecord>,
    pub max_records: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            pending: None,
            max_records: 1000,
        }
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            max_records,
            ..Self::default()
        }
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|record| record.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|record| record.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}

impl UndoJournal for UndoStack {
    fn record(&mut self, graph: &Graph, label: &str) {
        // Nested records fold into the outermost one until it is flushed.
        if self.pending.is_none() {
            self.pending = Some(UndoRecord {
                label: label.to_string(),
                graph: graph.clone(),
            });
        }
    }

    fn flush(&mut self) {
        let Some(record) = self.pending.take() else {
            return;
        };
        self.undo.push(record);
        self.redo.clear();
        if self.undo.len() > self.max_records {
            self.undo.remove(0);
        }
    }

    fn undo(&mut self, current: &Graph) -> Option<Graph> {
        let record = self.undo.pop()?;
        self.redo.push(UndoRecord {
            label: record.label.clone(),
            graph: current.clone(),
        });
        Some(record.graph)
    }

    fn redo(&mut self, current: &Graph) -> Option<Graph> {
        let record = self.redo.pop()?;
        self.undo.push(UndoRecord {
            label: record.label.clone(),
            graph: current.clone(),
        });
        Some(record.graph)
    }
}
