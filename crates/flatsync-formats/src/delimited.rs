//! Separator-delimited line formats

use flatsync_core::{Error, InstanceRegistry, Record, RecordFormat, Result};

/// Record kind of `#` comment lines.
pub const COMMENT_KIND: &str = "comment";
/// Record kind of empty lines.
pub const BLANK_KIND: &str = "blank";
/// Field holding the verbatim text of comment and blank lines.
pub const LINE_FIELD: &str = "line";

/// How columns are separated on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// A single character; empty columns are allowed (`a::c`).
    Char(char),
    /// Runs of spaces or tabs.
    Whitespace,
}

/// One record per line, columns split on a [`Separator`].
///
/// ```
/// use flatsync_core::RecordFormat;
/// use flatsync_formats::DelimitedFormat;
///
/// let passwd = DelimitedFormat::passwd();
/// let records = passwd.parse("alice:x:1000:1000::/home/alice:/bin/bash\n").unwrap();
///
/// assert_eq!(records[0].name, "alice");
/// assert_eq!(records[0].field("shell"), Some("/bin/bash"));
/// assert_eq!(records[0].field("comment"), None);
/// ```
#[derive(Debug, Clone)]
pub struct DelimitedFormat {
    kind: String,
    fields: Vec<String>,
    name_field: usize,
    separator: Separator,
    joiner: String,
    min_fields: usize,
    rest_field: bool,
    match_on: Option<String>,
}

impl DelimitedFormat {
    /// A format whose lines hold exactly `fields`, the first being the name.
    pub fn new(kind: impl Into<String>, fields: &[&str], separator: Separator) -> Self {
        let joiner = match separator {
            Separator::Char(c) => c.to_string(),
            Separator::Whitespace => "\t".to_string(),
        };
        Self {
            kind: kind.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            name_field: 0,
            separator,
            joiner,
            min_fields: fields.len(),
            rest_field: false,
            match_on: None,
        }
    }

    /// `/etc/passwd`: `name:password:uid:gid:comment:home:shell`.
    pub fn passwd() -> Self {
        Self::new(
            "passwd",
            &["name", "password", "uid", "gid", "comment", "home", "shell"],
            Separator::Char(':'),
        )
    }

    /// `/etc/group`: `name:password:gid:members`.
    pub fn group() -> Self {
        Self::new(
            "group",
            &["name", "password", "gid", "members"],
            Separator::Char(':'),
        )
    }

    /// `/etc/hosts`: `ip canonical [aliases...]`.
    ///
    /// Records are named by their canonical hostname. A record nobody
    /// claims by name is offered to the instance that wants the same `ip`.
    pub fn hosts() -> Self {
        Self::new("hosts", &["ip", "name", "aliases"], Separator::Whitespace)
            .with_name_field(1)
            .with_min_fields(2)
            .with_rest_field()
            .with_match_on("ip")
    }

    /// Column holding the record name.
    pub fn with_name_field(mut self, index: usize) -> Self {
        self.name_field = index;
        self
    }

    /// Fewest columns a line may have; trailing columns are optional.
    pub fn with_min_fields(mut self, count: usize) -> Self {
        self.min_fields = count;
        self
    }

    /// Let the last column absorb the rest of the line.
    pub fn with_rest_field(mut self) -> Self {
        self.rest_field = true;
        self
    }

    /// Claim unmatched records for the instance whose desired `attr` equals
    /// the record's.
    pub fn with_match_on(mut self, attr: impl Into<String>) -> Self {
        self.match_on = Some(attr.into());
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let max = self.fields.len();
        match self.separator {
            Separator::Char(c) if self.rest_field => line.splitn(max, c).collect(),
            Separator::Char(c) => line.split(c).collect(),
            Separator::Whitespace => {
                let mut parts: Vec<&str> = line.split_whitespace().collect();
                if self.rest_field && parts.len() > max {
                    // Rest column starts at the first byte of its first word
                    let start = parts[max - 1].as_ptr() as usize - line.as_ptr() as usize;
                    parts.truncate(max - 1);
                    parts.push(line[start..].trim_end());
                }
                parts
            }
        }
    }

    fn parse_line(&self, number: usize, line: &str) -> Result<Record> {
        if line.trim().is_empty() {
            return Ok(Record::new(BLANK_KIND, "").with_field(LINE_FIELD, line));
        }
        if line.trim_start().starts_with('#') {
            return Ok(Record::new(COMMENT_KIND, "").with_field(LINE_FIELD, line));
        }

        let columns = self.split(line);
        if columns.len() < self.min_fields || columns.len() > self.fields.len() {
            let expected = if self.min_fields == self.fields.len() {
                self.fields.len().to_string()
            } else {
                format!("{} to {}", self.min_fields, self.fields.len())
            };
            return Err(Error::Parse {
                line: number,
                message: format!(
                    "{} entry has {} fields, expected {}",
                    self.kind,
                    columns.len(),
                    expected
                ),
            });
        }

        let name = columns[self.name_field];
        if name.is_empty() {
            return Err(Error::Parse {
                line: number,
                message: format!("{} entry has an empty {}", self.kind, self.fields[self.name_field]),
            });
        }

        let mut record = Record::new(self.kind.as_str(), name);
        for (index, (field, value)) in self.fields.iter().zip(&columns).enumerate() {
            if index != self.name_field && !value.is_empty() {
                record.fields.insert(field.clone(), value.to_string());
            }
        }
        Ok(record)
    }

    fn render(&self, record: &Record) -> Result<String> {
        let last = self.fields.len() - 1;
        let mut columns = Vec::with_capacity(self.fields.len());

        for (index, field) in self.fields.iter().enumerate() {
            let value = if index == self.name_field {
                record.name.as_str()
            } else {
                record.field(field).unwrap_or("")
            };
            self.check_value(field, value, self.rest_field && index == last)?;
            columns.push(value);
        }

        if self.separator == Separator::Whitespace {
            while columns.len() > self.min_fields && columns.last().is_some_and(|c| c.is_empty()) {
                columns.pop();
            }
        }

        if let Some(index) = columns.iter().position(|c| c.is_empty())
            && (index == self.name_field || self.separator == Separator::Whitespace)
        {
            return Err(Error::InvalidValue {
                attr: self.fields[index].clone(),
                message: format!("{} entry {:?} needs a value here", self.kind, record.name),
            });
        }

        Ok(columns.join(&self.joiner))
    }

    fn check_value(&self, attr: &str, value: &str, is_rest: bool) -> Result<()> {
        let invalid = |message: &str| Error::InvalidValue {
            attr: attr.to_string(),
            message: message.to_string(),
        };

        if value.contains(['\n', '\r']) {
            return Err(invalid("contains a line break"));
        }
        match self.separator {
            Separator::Char(c) if !is_rest && value.contains(c) => {
                Err(invalid(&format!("contains the separator {c:?}")))
            }
            Separator::Whitespace if !is_rest && value.contains(char::is_whitespace) => {
                Err(invalid("contains whitespace"))
            }
            _ => Ok(()),
        }
    }
}

impl RecordFormat for DelimitedFormat {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn parse(&self, text: &str) -> Result<Vec<Record>> {
        text.lines()
            .enumerate()
            .map(|(index, line)| self.parse_line(index + 1, line))
            .collect()
    }

    fn to_text(&self, records: &[&Record]) -> Result<String> {
        let mut out = String::new();
        for record in records {
            if record.record_kind == self.kind {
                out.push_str(&self.render(record)?);
            } else {
                out.push_str(record.field(LINE_FIELD).unwrap_or_default());
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn valid_attr(&self, attr: &str) -> bool {
        self.fields.iter().any(|f| f == attr)
    }

    fn name_attr(&self) -> &str {
        &self.fields[self.name_field]
    }

    fn match_record(&self, record: &Record, instances: &InstanceRegistry) -> Result<Option<String>> {
        let Some(attr) = self.match_on.as_deref() else {
            return Ok(None);
        };
        let Some(value) = record.field(attr) else {
            return Ok(None);
        };

        Ok(instances
            .iter()
            .find(|instance| instance.should(attr).as_deref() == Some(value))
            .map(|instance| instance.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatsync_core::Resource;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render(format: &DelimitedFormat, text: &str) -> String {
        let records = format.parse(text).unwrap();
        let refs: Vec<&Record> = records.iter().collect();
        format.to_text(&refs).unwrap()
    }

    #[rstest]
    #[case::passwd(DelimitedFormat::passwd(), "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/bash\n")]
    #[case::group(DelimitedFormat::group(), "wheel:x:10:alice,bob\nusers:x:100:\n")]
    #[case::hosts(DelimitedFormat::hosts(), "127.0.0.1\tlocalhost\n192.168.1.10\tdb\tdb.internal backup\n")]
    #[case::comments(DelimitedFormat::passwd(), "# system accounts\n\nroot:x:0:0:root:/root:/bin/sh\n")]
    fn round_trips_exactly(#[case] format: DelimitedFormat, #[case] text: &str) {
        assert_eq!(render(&format, text), text);
    }

    #[test]
    fn hosts_normalizes_spacing() {
        let format = DelimitedFormat::hosts();
        assert_eq!(
            render(&format, "10.0.0.1   web    www  api\n"),
            "10.0.0.1\tweb\twww  api\n"
        );
    }

    #[test]
    fn hosts_rest_field_keeps_all_aliases() {
        let records = DelimitedFormat::hosts()
            .parse("10.0.0.1 web www api\n")
            .unwrap();
        assert_eq!(records[0].name, "web");
        assert_eq!(records[0].field("ip"), Some("10.0.0.1"));
        assert_eq!(records[0].field("aliases"), Some("www api"));
    }

    #[test]
    fn comments_and_blank_lines_become_other_kinds() {
        let records = DelimitedFormat::passwd().parse("# header\n\n").unwrap();
        assert_eq!(records[0].record_kind, COMMENT_KIND);
        assert_eq!(records[0].field(LINE_FIELD), Some("# header"));
        assert_eq!(records[1].record_kind, BLANK_KIND);
    }

    #[rstest]
    #[case("alice:x:1000:1000:/home/alice:/bin/bash", 1)]
    #[case("root:x:0:0:root:/root:/bin/sh\nbroken", 2)]
    #[case("root:x:0:0:root:/root:/bin/sh:extra", 1)]
    fn wrong_field_count_names_line(#[case] text: &str, #[case] expected_line: usize) {
        match DelimitedFormat::passwd().parse(text) {
            Err(Error::Parse { line, message }) => {
                assert_eq!(line, expected_line);
                assert!(message.contains("expected 7"), "got: {message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = DelimitedFormat::group().parse(":x:10:\n");
        assert!(matches!(result, Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn separator_inside_value_is_rejected() {
        let format = DelimitedFormat::passwd();
        let record = Record::new("passwd", "alice").with_field("comment", "Alice: admin");
        let result = format.to_text(&[&record]);
        assert!(matches!(result, Err(Error::InvalidValue { attr, .. }) if attr == "comment"));
    }

    #[test]
    fn missing_hosts_ip_is_rejected() {
        let format = DelimitedFormat::hosts();
        let record = Record::new("hosts", "db");
        assert!(matches!(
            format.to_text(&[&record]),
            Err(Error::InvalidValue { attr, .. }) if attr == "ip"
        ));
    }

    #[test]
    fn new_passwd_record_fills_empty_columns() {
        let format = DelimitedFormat::passwd();
        let record = Record::new("passwd", "carol")
            .with_field("uid", "1002")
            .with_field("shell", "/bin/sh");
        assert_eq!(format.to_text(&[&record]).unwrap(), "carol::1002::::/bin/sh\n");
    }

    #[test]
    fn valid_attr_lists_columns() {
        let format = DelimitedFormat::passwd();
        assert!(format.valid_attr("shell"));
        assert!(format.valid_attr("name"));
        assert!(!format.valid_attr("managehome"));
    }

    #[test]
    fn name_attr_follows_name_column() {
        assert_eq!(DelimitedFormat::passwd().name_attr(), "name");
        let services = DelimitedFormat::new("services", &["port", "service"], Separator::Whitespace)
            .with_name_field(1);
        assert_eq!(services.name_attr(), "service");
    }

    #[test]
    fn match_record_by_ip() {
        let mut instances = InstanceRegistry::new();
        instances.insert(Resource::new("database").with_should("ip", "192.168.1.10").into_shared());
        instances.insert(Resource::new("web").with_should("ip", "192.168.1.20").into_shared());

        let format = DelimitedFormat::hosts();
        let records = format.parse("192.168.1.10 db\n").unwrap();

        assert_eq!(
            format.match_record(&records[0], &instances).unwrap(),
            Some("database".to_string())
        );
        assert_eq!(
            DelimitedFormat::passwd().match_record(&records[0], &instances).unwrap(),
            None
        );
    }
}
