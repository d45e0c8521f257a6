use crate::models::VersionRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_humanize::HumanTime;
use std::fmt::Display;

/// Hashes longer than this get shortened for display.
const GIT_HASH_TRUNCATE_OVER: usize = 12;

/// How many characters of a shortened hash stay visible.
const GIT_HASH_VISIBLE_CHARS: usize = 10;

const GIT_HASH_MISSING: &str = "n/a";

/// Shown in place of both time forms when a time stamp cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// en-US locale style, e.g. "3/5/2024, 2:07:09 PM".
const ABSOLUTE_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Title of each column in display order.
pub const COLUMN_TITLES: [&str; 5] = [
    "State",
    "Version",
    "Deploy Time",
    "Image Name",
    "git hash",
];

/// The three mutually exclusive states a version's status cell can be in.
///
/// Only [`StatusCell::Revertible`] is interactive; the others are indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum StatusCell {
    #[strum(to_string = "Current Version")]
    Current,

    #[strum(to_string = "Failed deploy")]
    FailedDeploy,

    #[strum(to_string = "Revert to this version")]
    Revertible,
}

impl StatusCell {
    /// Picks the status by precedence: the live version first, then failed deploys,
    /// everything else can be reverted to.
    pub fn for_record(record: &VersionRecord, deployed_version: u64) -> Self {
        if record.version == deployed_version {
            return StatusCell::Current;
        }

        if record.image_name().is_none() {
            return StatusCell::FailedDeploy;
        }

        StatusCell::Revertible
    }

    pub fn is_revertible(&self) -> bool {
        matches!(self, StatusCell::Revertible)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            StatusCell::Current => "✓",
            StatusCell::FailedDeploy => "!",
            StatusCell::Revertible => "↺",
        }
    }
}

/// The time a version was deployed, both as a relative hint and an absolute date-time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTime {
    /// e.g. "3 hours ago"
    pub relative: String,

    /// Localized date-time in the timezone the row was formatted for.
    pub absolute: String,
}

impl DeployTime {
    pub fn new<Tz>(time_stamp: &str, now: DateTime<Utc>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let Some(deployed) = parse_time_stamp(time_stamp) else {
            return Self {
                relative: INVALID_DATE.to_string(),
                absolute: INVALID_DATE.to_string(),
            };
        };

        Self {
            relative: HumanTime::from(deployed - now).to_string(),
            absolute: deployed
                .with_timezone(tz)
                .format(ABSOLUTE_TIME_FORMAT)
                .to_string(),
        }
    }
}

/// Accepts RFC 3339 stamps, ISO-8601 stamps with a basic `+hhmm` offset, and offset-less stamps
/// or bare dates, which are read as UTC (dates at midnight).
fn parse_time_stamp(time_stamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(time_stamp) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_str(time_stamp, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(time_stamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(time_stamp, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHash {
    /// What fits in the column.
    pub display: String,

    /// The untruncated hash; empty if there is none.
    pub full: String,
}

impl GitHash {
    pub fn new(hash: Option<&str>) -> Self {
        let full = hash.unwrap_or_default().to_string();

        let display = if full.is_empty() {
            GIT_HASH_MISSING.to_string()
        } else if full.chars().count() > GIT_HASH_TRUNCATE_OVER {
            let visible: String = full.chars().take(GIT_HASH_VISIBLE_CHARS).collect();
            format!("{}...", visible)
        } else {
            full.clone()
        };

        Self { display, full }
    }

    pub fn is_truncated(&self) -> bool {
        !self.full.is_empty() && self.display != self.full
    }
}

/// Every display value for one version, ready to be laid out in a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRow {
    /// Row identity; the record's time stamp.
    pub key: String,
    pub status: StatusCell,
    pub version: u64,
    pub deploy_time: DeployTime,
    pub image_name: String,
    pub git_hash: GitHash,
}

impl VersionRow {
    pub fn new<Tz>(
        record: &VersionRecord,
        deployed_version: u64,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            key: record.time_stamp.clone(),
            status: StatusCell::for_record(record, deployed_version),
            version: record.version,
            deploy_time: DeployTime::new(&record.time_stamp, now, tz),
            image_name: record.deployed_image_name.clone().unwrap_or_default(),
            git_hash: GitHash::new(record.git_hash.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(version: u64, image: Option<&str>) -> VersionRecord {
        VersionRecord {
            version,
            time_stamp: format!("2024-03-0{}T10:00:00Z", version + 1),
            deployed_image_name: image.map(String::from),
            git_hash: None,
        }
    }

    #[rstest]
    #[case::live_version(3, Some("img-app:3"), 3, StatusCell::Current)]
    // The live version wins even if its image name went missing.
    #[case::live_version_without_image(3, None, 3, StatusCell::Current)]
    #[case::failed_deploy(2, None, 3, StatusCell::FailedDeploy)]
    #[case::failed_deploy_empty_name(2, Some(""), 3, StatusCell::FailedDeploy)]
    #[case::local_image(1, Some("img-app:1"), 3, StatusCell::Revertible)]
    #[case::registry_image(1, Some("registry.io/app:1"), 3, StatusCell::Revertible)]
    fn status_precedence(
        #[case] version: u64,
        #[case] image: Option<&str>,
        #[case] deployed_version: u64,
        #[case] expected: StatusCell,
    ) {
        let status = StatusCell::for_record(&record(version, image), deployed_version);
        assert_eq!(status, expected);
        assert_eq!(status.is_revertible(), expected == StatusCell::Revertible);
    }

    #[test]
    /// Exactly the live version carries the current indicator.
    fn only_deployed_version_is_current() {
        let records: Vec<VersionRecord> = (0..6)
            .map(|version| record(version, Some("img-app")))
            .collect();

        let current: Vec<u64> = records
            .iter()
            .filter(|r| StatusCell::for_record(r, 4) == StatusCell::Current)
            .map(|r| r.version)
            .collect();

        assert_eq!(current, vec![4]);
    }

    #[rstest]
    #[case::long_hash(Some("abcdef0123456789"), "abcdef0123...")]
    #[case::thirteen_chars(Some("abcdef0123456"), "abcdef0123...")]
    #[case::exactly_twelve(Some("abcdef012345"), "abcdef012345")]
    #[case::ten_chars(Some("abcdef0123"), "abcdef0123")]
    #[case::missing(None, "n/a")]
    #[case::empty(Some(""), "n/a")]
    fn git_hash_display(#[case] hash: Option<&str>, #[case] expected: &str) {
        let git_hash = GitHash::new(hash);
        assert_eq!(git_hash.display, expected);
        assert_eq!(git_hash.full, hash.unwrap_or_default());
    }

    #[test]
    fn git_hash_truncation_counts_chars() {
        let hash = "é".repeat(13);
        let git_hash = GitHash::new(Some(&hash));
        assert_eq!(git_hash.display, format!("{}...", "é".repeat(10)));
        assert!(git_hash.is_truncated());
    }

    #[test]
    fn deploy_time_forms() {
        let deployed = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let now = deployed + Duration::hours(3);

        let deploy_time = DeployTime::new("2024-03-05T14:07:09.000Z", now, &Utc);
        assert_eq!(deploy_time.relative, "3 hours ago");
        assert_eq!(deploy_time.absolute, "3/5/2024, 2:07:09 PM");

        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let deploy_time = DeployTime::new("2024-03-05T14:07:09Z", now, &east);
        assert_eq!(deploy_time.absolute, "3/5/2024, 4:07:09 PM");
    }

    #[test]
    fn deploy_time_without_offset_is_utc() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        let deploy_time = DeployTime::new("2024-03-04T09:30:00", now, &Utc);
        assert_eq!(deploy_time.absolute, "3/4/2024, 9:30:00 AM");
    }

    #[rstest]
    #[case::rfc3339_zulu("2024-03-04T09:30:00.000Z", "3/4/2024, 9:30:00 AM")]
    #[case::rfc3339_offset("2024-03-04T11:30:00+02:00", "3/4/2024, 9:30:00 AM")]
    #[case::basic_offset("2024-03-04T09:30:00.000+0000", "3/4/2024, 9:30:00 AM")]
    #[case::basic_offset_east("2024-03-04T10:30:00+0100", "3/4/2024, 9:30:00 AM")]
    #[case::no_offset("2024-03-04T09:30:00", "3/4/2024, 9:30:00 AM")]
    #[case::date_only("2024-03-04", "3/4/2024, 12:00:00 AM")]
    fn deploy_time_accepts_iso8601(#[case] time_stamp: &str, #[case] expected: &str) {
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap();

        let deploy_time = DeployTime::new(time_stamp, now, &Utc);

        assert_eq!(deploy_time.absolute, expected);
        assert_ne!(deploy_time.relative, INVALID_DATE);
    }

    #[test]
    fn deploy_time_invalid_stamp() {
        let deploy_time = DeployTime::new("yesterday-ish", Utc::now(), &Utc);
        assert_eq!(deploy_time.relative, INVALID_DATE);
        assert_eq!(deploy_time.absolute, INVALID_DATE);
    }

    #[test]
    fn row_carries_every_column() {
        let record = VersionRecord {
            version: 7,
            time_stamp: "2024-03-05T14:07:09Z".into(),
            deployed_image_name: Some("img-captain-web:7".into()),
            git_hash: Some("0123456789abcdef0123".into()),
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 14, 7, 9).unwrap();

        let row = VersionRow::new(&record, 8, now, &Utc);

        assert_eq!(row.key, "2024-03-05T14:07:09Z");
        assert_eq!(row.status, StatusCell::Revertible);
        assert_eq!(row.version, 7);
        assert_eq!(row.image_name, "img-captain-web:7");
        assert_eq!(row.git_hash.display, "0123456789...");
        assert_eq!(row.git_hash.full, "0123456789abcdef0123");
    }
}
