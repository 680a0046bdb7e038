//! Duration table: the only external configuration the engine accepts.
//!
//! A fixed set of named keys (§6 of the specification this engine
//! implements), each a positive integer number of seconds. The default
//! table is complete; an optional JSON overlay may only override keys it
//! already recognizes. See [`DurationTable::load`].

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ConfigError;

/// Default duration, in seconds, for every recognized key.
///
/// Loaded once at startup and immutable afterwards (optionally overlaid
/// from an external file via [`DurationTable::load`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTable {
    // ── Stage A ──────────────────────────────────────────────────
    pub a_fz_ah: u32,
    pub a_me_to_store: u32,
    pub a_mg_grip: u32,
    pub a_me_back: u32,
    pub a_mr_to_head: u32,
    pub a_me_to_head: u32,
    pub a_fz_hg: u32,
    pub a_couple_ge: u32,
    pub a_dh_lock: u32,
    pub a_mg_release: u32,
    pub a_me_back_from_head: u32,
    pub a_mr_back_to_store: u32,
    pub a_drill: u32,
    pub a_cb_clamp: u32,
    pub a_dh_unlock: u32,
    pub a_break_ac: u32,
    pub a_fz_ch: u32,

    // ── Stage B ──────────────────────────────────────────────────
    pub sr_index: u32,
    pub b_me_to_store: u32,
    pub b_mg_grip: u32,
    pub b_me_back: u32,
    pub b_mr_to_head: u32,
    pub b_me_to_head: u32,
    pub b_fz_hf: u32,
    pub b_couple_fd: u32,
    pub b_dh_lock: u32,
    pub b_mg_release: u32,
    pub b_me_back_from_head: u32,
    pub b_mr_back_to_store: u32,
    pub b_fz_dj: u32,
    pub b_couple_ji: u32,
    pub b_cb_release: u32,
    pub b_drill: u32,
    pub b_cb_clamp: u32,
    pub b_dh_unlock: u32,
    pub b_break_ac: u32,
    pub b_fz_ch: u32,

    // ── Stage C ──────────────────────────────────────────────────
    pub c_fz_hc: u32,
    pub c_couple_cb: u32,
    pub c_dh_lock: u32,
    pub c_cb_release: u32,
    pub c_fz_bi: u32,
    pub c_cb_clamp: u32,
    pub c_break_ij: u32,
    pub c_fz_jd: u32,
    pub c_mr_assist: u32,
    pub c_me_assist: u32,
    pub c_mg_grip: u32,
    pub c_dh_unlock: u32,
    pub c_break_df: u32,
    pub c_fz_fh: u32,
    pub c_me_retract: u32,
    pub c_mr_retract: u32,
    pub c_me_store: u32,
    pub c_mg_release: u32,
    pub c_me_back: u32,
    pub c_sr_next: u32,

    // ── Stage D ──────────────────────────────────────────────────
    pub d_fz_hc: u32,
    pub d_couple_cb: u32,
    pub d_dh_lock: u32,
    pub d_cb_release: u32,
    pub d_fz_be: u32,
    pub d_mr_assist: u32,
    pub d_me_assist: u32,
    pub d_mg_grip: u32,
    pub d_dh_unlock: u32,
    pub d_break_eg: u32,
    pub d_fz_gh: u32,
    pub d_sr_reset: u32,
    pub d_me_retract: u32,
    pub d_mr_retract: u32,
    pub d_me_store: u32,
    pub d_mg_release: u32,
    pub d_me_back: u32,
}

impl Default for DurationTable {
    fn default() -> Self {
        Self {
            a_fz_ah: 8,
            a_me_to_store: 4,
            a_mg_grip: 3,
            a_me_back: 4,
            a_mr_to_head: 5,
            a_me_to_head: 5,
            a_fz_hg: 6,
            a_couple_ge: 7,
            a_dh_lock: 3,
            a_mg_release: 3,
            a_me_back_from_head: 5,
            a_mr_back_to_store: 5,
            a_drill: 20,
            a_cb_clamp: 3,
            a_dh_unlock: 3,
            a_break_ac: 7,
            a_fz_ch: 6,

            sr_index: 4,
            b_me_to_store: 4,
            b_mg_grip: 3,
            b_me_back: 4,
            b_mr_to_head: 5,
            b_me_to_head: 5,
            b_fz_hf: 6,
            b_couple_fd: 7,
            b_dh_lock: 3,
            b_mg_release: 3,
            b_me_back_from_head: 5,
            b_mr_back_to_store: 5,
            b_fz_dj: 6,
            b_couple_ji: 7,
            b_cb_release: 3,
            b_drill: 20,
            b_cb_clamp: 3,
            b_dh_unlock: 3,
            b_break_ac: 7,
            b_fz_ch: 6,

            c_fz_hc: 6,
            c_couple_cb: 7,
            c_dh_lock: 3,
            c_cb_release: 3,
            c_fz_bi: 6,
            c_cb_clamp: 3,
            c_break_ij: 7,
            c_fz_jd: 6,
            c_mr_assist: 5,
            c_me_assist: 5,
            c_mg_grip: 3,
            c_dh_unlock: 3,
            c_break_df: 7,
            c_fz_fh: 6,
            c_me_retract: 5,
            c_mr_retract: 5,
            c_me_store: 4,
            c_mg_release: 3,
            c_me_back: 4,
            c_sr_next: 4,

            d_fz_hc: 6,
            d_couple_cb: 7,
            d_dh_lock: 3,
            d_cb_release: 3,
            d_fz_be: 6,
            d_mr_assist: 5,
            d_me_assist: 5,
            d_mg_grip: 3,
            d_dh_unlock: 3,
            d_break_eg: 7,
            d_fz_gh: 6,
            d_sr_reset: 4,
            d_me_retract: 5,
            d_mr_retract: 5,
            d_me_store: 4,
            d_mg_release: 3,
            d_me_back: 4,
        }
    }
}

/// One `(json key, field setter)` entry used to apply the overlay.
type Field = (&'static str, fn(&mut DurationTable, u32));

/// All recognized overlay keys, in declaration order.
const FIELDS: &[Field] = &[
    ("A_FZ_AH", |t, v| t.a_fz_ah = v),
    ("A_ME_to_store", |t, v| t.a_me_to_store = v),
    ("A_MG_grip", |t, v| t.a_mg_grip = v),
    ("A_ME_back", |t, v| t.a_me_back = v),
    ("A_MR_to_head", |t, v| t.a_mr_to_head = v),
    ("A_ME_to_head", |t, v| t.a_me_to_head = v),
    ("A_FZ_HG", |t, v| t.a_fz_hg = v),
    ("A_COUPLE_GE", |t, v| t.a_couple_ge = v),
    ("A_DH_lock", |t, v| t.a_dh_lock = v),
    ("A_MG_release", |t, v| t.a_mg_release = v),
    ("A_ME_back_from_head", |t, v| t.a_me_back_from_head = v),
    ("A_MR_back_to_store", |t, v| t.a_mr_back_to_store = v),
    ("A_DRILL", |t, v| t.a_drill = v),
    ("A_CB_clamp", |t, v| t.a_cb_clamp = v),
    ("A_DH_unlock", |t, v| t.a_dh_unlock = v),
    ("A_BREAK_AC", |t, v| t.a_break_ac = v),
    ("A_FZ_CH", |t, v| t.a_fz_ch = v),
    ("SR_INDEX", |t, v| t.sr_index = v),
    ("B_ME_to_store", |t, v| t.b_me_to_store = v),
    ("B_MG_grip", |t, v| t.b_mg_grip = v),
    ("B_ME_back", |t, v| t.b_me_back = v),
    ("B_MR_to_head", |t, v| t.b_mr_to_head = v),
    ("B_ME_to_head", |t, v| t.b_me_to_head = v),
    ("B_FZ_HF", |t, v| t.b_fz_hf = v),
    ("B_COUPLE_FD", |t, v| t.b_couple_fd = v),
    ("B_DH_lock", |t, v| t.b_dh_lock = v),
    ("B_MG_release", |t, v| t.b_mg_release = v),
    ("B_ME_back_from_head", |t, v| t.b_me_back_from_head = v),
    ("B_MR_back_to_store", |t, v| t.b_mr_back_to_store = v),
    ("B_FZ_DJ", |t, v| t.b_fz_dj = v),
    ("B_COUPLE_JI", |t, v| t.b_couple_ji = v),
    ("B_CB_release", |t, v| t.b_cb_release = v),
    ("B_DRILL", |t, v| t.b_drill = v),
    ("B_CB_clamp", |t, v| t.b_cb_clamp = v),
    ("B_DH_unlock", |t, v| t.b_dh_unlock = v),
    ("B_BREAK_AC", |t, v| t.b_break_ac = v),
    ("B_FZ_CH", |t, v| t.b_fz_ch = v),
    ("C_FZ_HC", |t, v| t.c_fz_hc = v),
    ("C_COUPLE_CB", |t, v| t.c_couple_cb = v),
    ("C_DH_lock", |t, v| t.c_dh_lock = v),
    ("C_CB_release", |t, v| t.c_cb_release = v),
    ("C_FZ_BI", |t, v| t.c_fz_bi = v),
    ("C_CB_clamp", |t, v| t.c_cb_clamp = v),
    ("C_BREAK_IJ", |t, v| t.c_break_ij = v),
    ("C_FZ_JD", |t, v| t.c_fz_jd = v),
    ("C_MR_Assist", |t, v| t.c_mr_assist = v),
    ("C_ME_Assist", |t, v| t.c_me_assist = v),
    ("C_MG_Grip", |t, v| t.c_mg_grip = v),
    ("C_DH_unlock", |t, v| t.c_dh_unlock = v),
    ("C_BREAK_DF", |t, v| t.c_break_df = v),
    ("C_FZ_FH", |t, v| t.c_fz_fh = v),
    ("C_ME_Retract", |t, v| t.c_me_retract = v),
    ("C_MR_Retract", |t, v| t.c_mr_retract = v),
    ("C_ME_Store", |t, v| t.c_me_store = v),
    ("C_MG_Release", |t, v| t.c_mg_release = v),
    ("C_ME_Back", |t, v| t.c_me_back = v),
    ("C_SR_Next", |t, v| t.c_sr_next = v),
    ("D_FZ_HC", |t, v| t.d_fz_hc = v),
    ("D_COUPLE_CB", |t, v| t.d_couple_cb = v),
    ("D_DH_lock", |t, v| t.d_dh_lock = v),
    ("D_CB_release", |t, v| t.d_cb_release = v),
    ("D_FZ_BE", |t, v| t.d_fz_be = v),
    ("D_MR_Assist", |t, v| t.d_mr_assist = v),
    ("D_ME_Assist", |t, v| t.d_me_assist = v),
    ("D_MG_Grip", |t, v| t.d_mg_grip = v),
    ("D_DH_unlock", |t, v| t.d_dh_unlock = v),
    ("D_BREAK_EG", |t, v| t.d_break_eg = v),
    ("D_FZ_GH", |t, v| t.d_fz_gh = v),
    ("D_SR_Reset", |t, v| t.d_sr_reset = v),
    ("D_ME_Retract", |t, v| t.d_me_retract = v),
    ("D_MR_Retract", |t, v| t.d_mr_retract = v),
    ("D_ME_Store", |t, v| t.d_me_store = v),
    ("D_MG_Release", |t, v| t.d_mg_release = v),
    ("D_ME_Back", |t, v| t.d_me_back = v),
];

impl DurationTable {
    /// Build the default table, then overlay `path` if given.
    ///
    /// A missing file is not an error — it simply means "no overlay".
    /// A present-but-malformed file (bad JSON, or a non-object root)
    /// is logged as a warning and the defaults are used as-is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        let Some(path) = path else {
            return Ok(table);
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no duration overlay file, using defaults");
                return Ok(table);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(source) => {
                warn!(path = %path.display(), %source, "duration overlay is not valid JSON, using defaults");
                return Ok(table);
            }
        };

        let Value::Object(map) = value else {
            warn!(path = %path.display(), "duration overlay root is not a JSON object, using defaults");
            return Ok(table);
        };

        for (key, value) in &map {
            let Some((_, setter)) = FIELDS.iter().find(|(name, _)| name == key) else {
                continue;
            };
            match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(seconds) if seconds > 0 => setter(&mut table, seconds),
                _ => warn!(
                    key,
                    value = %value,
                    "duration overlay key has a non-positive-integer value, keeping default"
                ),
            }
        }

        info!(path = %path.display(), overridden = map.len(), "loaded duration overlay");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_only_positive_durations() {
        let t = DurationTable::default();
        assert!(t.a_fz_ah > 0);
        assert!(t.d_me_back > 0);
    }

    #[test]
    fn missing_overlay_file_falls_back_to_defaults() {
        let t = DurationTable::load(Some(Path::new("/nonexistent/path/durations.json"))).unwrap();
        assert_eq!(t, DurationTable::default());
    }

    #[test]
    fn overlay_overrides_known_keys_ignores_unknown_and_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durations.json");
        std::fs::write(
            &path,
            r#"{"A_DRILL": 1, "NOT_A_REAL_KEY": 99, "B_DRILL": "five"}"#,
        )
        .unwrap();

        let t = DurationTable::load(Some(&path)).unwrap();
        assert_eq!(t.a_drill, 1);
        assert_eq!(t.b_drill, DurationTable::default().b_drill);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durations.json");
        std::fs::write(&path, "not json at all {").unwrap();

        let t = DurationTable::load(Some(&path)).unwrap();
        assert_eq!(t, DurationTable::default());
    }

    #[test]
    fn non_object_root_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durations.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let t = DurationTable::load(Some(&path)).unwrap();
        assert_eq!(t, DurationTable::default());
    }
}
