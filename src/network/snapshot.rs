use serde::{Serialize, Deserialize};

/// Flat, versionless snapshot of a trained network.
///
/// Wire field names are fixed (`inputNodes`, …, `learningRate`); readers
/// validate nothing beyond structural shape, so any future format change
/// must introduce a version field to stay backward-readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    #[serde(rename = "inputNodes")]
    pub input_nodes: usize,
    #[serde(rename = "hiddenNodes")]
    pub hidden_nodes: usize,
    #[serde(rename = "outputNodes")]
    pub output_nodes: usize,
    /// hiddenNodes × inputNodes
    pub weights_ih: Vec<Vec<f64>>,
    /// outputNodes × hiddenNodes
    pub weights_ho: Vec<Vec<f64>>,
    /// hiddenNodes × 1
    pub bias_h: Vec<Vec<f64>>,
    /// outputNodes × 1
    pub bias_o: Vec<Vec<f64>>,
    #[serde(rename = "learningRate")]
    pub learning_rate: f64,
}

impl NetworkSnapshot {
    /// Serializes the snapshot to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a snapshot from a JSON file previously written by
    /// `save_json` (or any structurally matching producer).
    pub fn load_json(path: &str) -> std::io::Result<NetworkSnapshot> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
