//! One subcommand per backend operation.

use clap::Subcommand;
use neurolens_client::ModelInspector;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Load a model into backend memory
    Load { model: String },
    /// Reinitialise a loaded model's mutable state
    Reset { model: String },
    /// Print a model's structural description
    Architecture { model: String },
    /// List a model's layer names
    Layers { model: String },
    /// Run inference on a prompt
    Generate { model: String, prompt: String },
    /// Per-neuron activations of a layer
    Activations { model: String, layer: String },
    /// Per-neuron biases of a layer
    Biases { model: String, layer: String },
    /// Per-neuron input averages of a layer
    InputAvgs { model: String, layer: String },
    /// Per-neuron input standard deviations of a layer
    InputStds { model: String, layer: String },
    /// Overwrite one neuron's bias
    SetBias {
        model: String,
        layer: String,
        neuron_index: usize,
        #[arg(allow_negative_numbers = true)]
        bias_value: f64,
    },
    /// Set the timestep backend reads refer to
    Timestep { model: String, index: u64 },
    /// Backend health check
    Health,
    /// Backend name and version
    Info,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Load { .. } => "load",
            Command::Reset { .. } => "reset",
            Command::Architecture { .. } => "architecture",
            Command::Layers { .. } => "layers",
            Command::Generate { .. } => "generate",
            Command::Activations { .. } => "activations",
            Command::Biases { .. } => "biases",
            Command::InputAvgs { .. } => "input-avgs",
            Command::InputStds { .. } => "input-stds",
            Command::SetBias { .. } => "set-bias",
            Command::Timestep { .. } => "timestep",
            Command::Health => "health",
            Command::Info => "info",
        }
    }
}

/// Run `command` against the backend and return its result as JSON.
pub async fn run(inspector: &dyn ModelInspector, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Load { model } => Value::Object(inspector.load_model(&model).await?),
        Command::Reset { model } => Value::Object(inspector.reset_model(&model).await?),
        Command::Architecture { model } => inspector.get_architecture(&model).await?,
        Command::Layers { model } => serde_json::to_value(inspector.get_layer_names(&model).await?)?,
        Command::Generate { model, prompt } => {
            Value::String(inspector.generate_output(&model, &prompt).await?)
        }
        Command::Activations { model, layer } => inspector.get_layer_activations(&model, &layer).await?,
        Command::Biases { model, layer } => {
            Value::Object(inspector.get_layer_biases(&model, &layer).await?)
        }
        Command::InputAvgs { model, layer } => inspector.get_layer_input_avgs(&model, &layer).await?,
        Command::InputStds { model, layer } => inspector.get_layer_input_stds(&model, &layer).await?,
        Command::SetBias { model, layer, neuron_index, bias_value } => Value::String(
            inspector.set_neuron_bias(&model, &layer, neuron_index, bias_value).await?,
        ),
        Command::Timestep { model, index } => Value::from(inspector.set_timestep(&model, index).await?),
        Command::Health => serde_json::to_value(inspector.health_check().await?)?,
        Command::Info => serde_json::to_value(inspector.backend_info().await?)?,
    };
    Ok(value)
}
