//! Sample backing-file content.

/// A single account, the shape most engine tests start from.
pub const PASSWD_ALICE: &str = "alice:x:1000:1000::/home/alice:/bin/bash\n";

/// System accounts plus two users, with a comment and a blank line.
pub const PASSWD_SYSTEM: &str = "\
# system accounts
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin

alice:x:1000:1000::/home/alice:/bin/bash
bob:x:1001:1001:Bob:/home/bob:/bin/sh
";

pub const GROUP_BASIC: &str = "\
root:x:0:
wheel:x:10:alice
users:x:100:alice,bob
";

pub const HOSTS_BASIC: &str = "\
127.0.0.1\tlocalhost
192.168.1.10\tdb\tdb.internal
";
