use crate::options::Options;
use crate::store::{load_json, save_json, LoadError, SaveError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;

/// The best score achieved for each combination of options, keyed by
/// [`Options::score_key()`]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct HighScores(BTreeMap<String, NonZeroU32>);

impl HighScores {
    const WHAT: &'static str = "high scores";

    pub(crate) fn load(path: Option<&Path>) -> Result<HighScores, LoadError> {
        let path = path.ok_or_else(|| LoadError::no_path(Self::WHAT))?;
        load_json(path, Self::WHAT)
    }

    pub(crate) fn save(&self, path: Option<&Path>) -> Result<(), SaveError> {
        let path = path.ok_or_else(|| SaveError::no_path(Self::WHAT))?;
        save_json(path, Self::WHAT, self)
    }

    pub(crate) fn get(&self, opts: Options) -> Option<NonZeroU32> {
        self.0.get(&opts.score_key()).copied()
    }

    /// Record `score` for `opts` if it beats the current best.  Returns
    /// `true` if anything changed.
    pub(crate) fn record(&mut self, opts: Options, score: u32) -> bool {
        let Some(score) = NonZeroU32::new(score) else {
            return false;
        };
        if self.get(opts).is_some_and(|best| best >= score) {
            return false;
        }
        self.0.insert(opts.score_key(), score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Difficulty;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn record_only_improvements() {
        let mut scores = HighScores::default();
        let opts = Options::default();
        assert!(!scores.record(opts, 0));
        assert_eq!(scores.get(opts), None);
        assert!(scores.record(opts, 40));
        assert!(!scores.record(opts, 30));
        assert!(!scores.record(opts, 40));
        assert_eq!(scores.get(opts), NonZeroU32::new(40));
        let hard = Options {
            difficulty: Difficulty::Hard,
            ..opts
        };
        assert_eq!(scores.get(hard), None);
    }

    #[test]
    fn save_and_reload() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("highscores.json");
        let mut scores = HighScores::default();
        scores.record(Options::default(), 120);
        scores.record(
            Options {
                wraparound: false,
                ..Options::default()
            },
            70,
        );
        scores.save(Some(&path)).unwrap();
        let src = fs_err::read_to_string(&path).unwrap();
        assert_eq!(
            src,
            "{\n  \"medium/walls/power-ups\": 70,\n  \"medium/wrap/power-ups\": 120\n}\n"
        );
        assert_eq!(HighScores::load(Some(&path)).unwrap(), scores);
    }

    #[test]
    fn no_path() {
        assert!(HighScores::load(None).is_err());
        assert!(HighScores::default().save(None).is_err());
    }
}
