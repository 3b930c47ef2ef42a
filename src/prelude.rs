pub use crate::builder::{DEFAULT_BUCKET_COUNT, TableBuilder};
pub use crate::compare::{cosine_similarity, difference, difference_count, norm};
pub use crate::ds::{FixedKey, HashStrategy, MAX_KEY_LEN, is_prime, next_prime};
pub use crate::error::{ErrorKind, InvariantError, TableError};
pub use crate::iter::{Cursor, Iter};
#[cfg(feature = "metrics")]
pub use crate::metrics::exporter::PrometheusTextExporter;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::TableMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsReset, MetricsSnapshotProvider};
pub use crate::table::{WordTable, count_of};
pub use crate::tokenize::{FillError, FillOptions, FillStats, Tokenizer, fill_table, fill_table_from_path};
