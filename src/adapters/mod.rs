// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod export;
pub mod input;
pub mod notifier;
pub mod png;
pub mod storage;
pub mod tesseract;

pub use export::EventExporter;
pub use input::select_png_input;
pub use notifier::TracingNotifier;
pub use png::PngDecoder;
pub use storage::LocalStorage;
pub use tesseract::TesseractRecognizer;
