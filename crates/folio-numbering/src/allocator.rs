use tracing::{debug, warn};

use folio_store::NumberSource;

use crate::config::AllocatorConfig;
use crate::error::{NumberingError, Result};
use crate::scheme::NumberScheme;
use crate::sequence::extract_sequence;

/// Scan-and-probe identifier allocator.
///
/// Holds no state between calls; every allocation reads the stores afresh.
/// Concurrent allocations for the same scheme are expected and converge
/// through the stores' uniqueness constraints.
#[derive(Clone, Debug, Default)]
pub struct NumberAllocator {
    config: AllocatorConfig,
}

impl NumberAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Highest sequence issued under the scheme's prefix across `sources`.
    pub fn highest_sequence(
        &self,
        scheme: &NumberScheme,
        sources: &[&dyn NumberSource],
    ) -> Result<u64> {
        let prefix = scheme.prefix();
        let field = scheme.field();
        let mut highest = 0;
        for source in sources {
            for number in source.numbers_with_prefix(field, &prefix)? {
                highest = highest.max(extract_sequence(Some(&number), &prefix));
            }
        }
        Ok(highest)
    }

    /// Produce an identifier that, at the moment of the check, exists in
    /// none of `sources`.
    ///
    /// `sources` must list every store that shares the scheme's namespace.
    /// The first candidate is the highest issued sequence plus one (so the
    /// minimum is `0001`); taken candidates are skipped until a free one is
    /// found or `max_attempts` probes have been spent.
    pub fn allocate(&self, scheme: &NumberScheme, sources: &[&dyn NumberSource]) -> Result<String> {
        let prefix = scheme.prefix();
        let field = scheme.field();
        let exhausted = |attempts: u32| NumberingError::AllocationExhausted {
            prefix: prefix.clone(),
            attempts,
        };

        let mut sequence = self
            .highest_sequence(scheme, sources)?
            .checked_add(1)
            .ok_or_else(|| exhausted(0))?;

        for attempt in 1..=self.config.max_attempts {
            let candidate = scheme.format(sequence, self.config.sequence_width);
            let mut holder = None;
            for source in sources {
                if source.number_exists(field, &candidate)? {
                    holder = Some(source.source_name());
                    break;
                }
            }

            match holder {
                None => {
                    debug!(%scheme, number = %candidate, attempt, "number allocated");
                    return Ok(candidate);
                }
                Some(store) => {
                    debug!(%scheme, number = %candidate, store, attempt, "candidate taken");
                    sequence = sequence.checked_add(1).ok_or_else(|| exhausted(attempt))?;
                }
            }
        }

        warn!(
            %scheme,
            prefix = %prefix,
            attempts = self.config.max_attempts,
            "number allocation exhausted its attempt budget"
        );
        Err(exhausted(self.config.max_attempts))
    }
}
