//! Run-level tallies, collected after the pipeline drains.

/// Stats from one recommendation pipeline run.
#[derive(Debug, Default, Clone)]
pub struct PipelineStats {
    pub followers_sampled: usize,
    pub channel_total_followers: u64,
    /// Followers whose followings were tallied.
    pub followings_kept: u32,
    /// Followers skipped (over cap, empty, or fetch failure).
    pub followings_skipped: u32,
    /// Distinct candidate channels observed in the tally.
    pub candidates_observed: usize,
    /// Candidates over the mutual threshold.
    pub mutual_candidates: usize,
    /// Candidate ids emitted downstream (incremental + terminal flush).
    pub ids_emitted: usize,
    /// Candidate batches that contained at least one live stream.
    pub live_batches_hit: u32,
    /// Candidate batches with no live stream in them.
    pub live_batches_missed: u32,
    /// Live channels found.
    pub live_found: usize,
    /// Live channels enriched with a follower total.
    pub enriched: u32,
    /// Enrichment fetches that failed.
    pub enrich_failed: u32,
}

impl std::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Recommendation Run Complete ===")?;
        writeln!(f, "Followers sampled:   {}", self.followers_sampled)?;
        writeln!(f, "Channel followers:   {}", self.channel_total_followers)?;
        writeln!(f, "Followings kept:     {}", self.followings_kept)?;
        writeln!(f, "Followings skipped:  {}", self.followings_skipped)?;
        writeln!(
            f,
            "Followings total:    {}",
            self.followings_kept + self.followings_skipped
        )?;
        writeln!(f, "Candidates observed: {}", self.candidates_observed)?;
        writeln!(f, "Mutual candidates:   {}", self.mutual_candidates)?;
        writeln!(f, "Candidate ids sent:  {}", self.ids_emitted)?;
        writeln!(
            f,
            "Live batches:        {} hit / {} missed",
            self.live_batches_hit, self.live_batches_missed
        )?;
        writeln!(f, "Live channels:       {}", self.live_found)?;
        writeln!(
            f,
            "Enriched:            {} ({} failed)",
            self.enriched, self.enrich_failed
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_headline_numbers() {
        let stats = PipelineStats {
            followers_sampled: 10,
            mutual_candidates: 4,
            live_found: 2,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Followers sampled:   10"));
        assert!(rendered.contains("Mutual candidates:   4"));
        assert!(rendered.contains("Live channels:       2"));
    }
}
