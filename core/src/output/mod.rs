//! Classification of the build tool's human-readable output into located,
//! typed items, and the channel that carries them to the host's output view.
mod classifier;
mod item;
mod sink;

pub use classifier::{classify, ClassifierState, OutputClassifier};
pub use item::{Category, Location, OutputItem, OutputLine};
pub use sink::{drain_into, output_channel, OutputRx, OutputSink, OutputTx};
