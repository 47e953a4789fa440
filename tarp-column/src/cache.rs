use std::fmt::{Debug, Formatter};
use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::adapter::{ColumnId, FileAdapter};
use crate::element::{decode_block, Element};
use crate::error::ColumnError;
use crate::null::NullPolicy;
use crate::offset::RowLayout;

#[derive(Clone)]
/// The stored block a column is materialized from.
pub(crate) struct BlockSource {
    pub(crate) adapter: Arc<dyn FileAdapter>,
    pub(crate) id: ColumnId,
}

impl Debug for BlockSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockSource({})", self.id)
    }
}

#[derive(Debug, Copy, Clone)]
/// Where the rows of a column live within its stored block.
pub(crate) struct BlockWindow {
    pub(crate) layout: RowLayout,
    pub(crate) width: usize,
    pub(crate) row_start: usize,
}

impl BlockWindow {
    fn rows(&self) -> Range<usize> {
        self.row_start..self.row_start + self.layout.length
    }
}

#[derive(Debug, Clone)]
/// The in-memory buffer of a column, loaded on first use.
///
/// The buffer is either absent or holds exactly `length * repeat` elements.
/// It is only ever replaced wholesale, so a failed fetch or reshape never
/// leaves a partially written buffer behind.
pub(crate) struct LazyBuffer<T> {
    data: Option<Vec<T>>,
    source: Option<BlockSource>,
    /// The undefined marker of the stored block.
    stored_null: Option<T>,
}

impl<T> Default for LazyBuffer<T> {
    fn default() -> Self {
        Self {
            data: None,
            source: None,
            stored_null: None,
        }
    }
}

impl<T: Element> LazyBuffer<T> {
    /// Creates a buffer that is materialized from the given block.
    pub(crate) fn backed_by(source: BlockSource, stored_null: Option<T>) -> Self {
        Self {
            data: None,
            source: Some(source),
            stored_null,
        }
    }

    /// Creates a buffer that is already materialized.
    ///
    /// An empty set of values leaves the buffer unloaded.
    pub(crate) fn with_values(values: Vec<T>) -> Self {
        let mut slf = Self::default();
        slf.replace(values);
        slf
    }

    #[inline]
    pub(crate) fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    #[inline]
    pub(crate) fn source(&self) -> Option<&BlockSource> {
        self.source.as_ref()
    }

    #[inline]
    /// The materialized values, if loaded.
    pub(crate) fn values(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// Ensures the buffer is materialized and returns it.
    ///
    /// A buffer backed by a block is read through the adapter, a buffer
    /// without one is zero filled.
    pub(crate) fn ensure_loaded(
        &mut self,
        window: BlockWindow,
        null: &NullPolicy<T>,
    ) -> Result<&mut Vec<T>, ColumnError> {
        let data = match self.data.take() {
            Some(data) => data,
            None => match self.source.as_ref() {
                Some(source) => self.fetch(source, window, null)?,
                None => {
                    debug!(size = window.layout.size(), "Materializing unbacked column");
                    vec![T::zero(); window.layout.size()]
                },
            },
        };

        Ok(self.data.insert(data))
    }

    #[instrument("fetch-column", skip_all, fields(column = %source.id, rows = ?window.rows()))]
    fn fetch(
        &self,
        source: &BlockSource,
        window: BlockWindow,
        null: &NullPolicy<T>,
    ) -> Result<Vec<T>, ColumnError> {
        let block = source
            .adapter
            .read_column_block(&source.id, window.rows())
            .inspect_err(|e| warn!(error = ?e, "Failed to read column block"))?;

        let mut values = decode_block::<T>(
            &block,
            window.layout.length,
            window.layout.repeat,
            window.width,
        )
        .inspect_err(|e| warn!(error = ?e, "Failed to decode column block"))?;

        null.substitute(&mut values, self.stored_null.as_ref());

        debug!(elements = values.len(), "Fetched column");
        Ok(values)
    }

    /// Frees the buffer, does nothing if the buffer is not loaded.
    pub(crate) fn release(&mut self) {
        if let Some(data) = self.data.take() {
            debug!(elements = data.len(), "Released column buffer");
        }
    }

    /// Replaces the buffer with `size` zero values, discarding its contents.
    ///
    /// A size of zero releases the buffer instead.
    pub(crate) fn allocate(&mut self, size: usize) -> &mut [T] {
        if size == 0 {
            self.release();
            return &mut [];
        }
        self.data.insert(vec![T::zero(); size])
    }

    /// Swaps in a fully built buffer.
    ///
    /// An empty buffer releases the column rather than keeping
    /// a zero length allocation around.
    pub(crate) fn replace(&mut self, values: Vec<T>) {
        if values.is_empty() {
            self.release();
        } else {
            self.data = Some(values);
        }
    }

    /// Binds the buffer to a new stored block.
    pub(crate) fn attach(&mut self, source: BlockSource, stored_null: Option<T>) {
        self.source = Some(source);
        self.stored_null = stored_null;
    }

    /// Forgets the stored block, the in-memory buffer becomes the only copy.
    pub(crate) fn detach(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(column = %source.id, "Detached column from stored block");
        }
        self.stored_null = None;
    }
}
