use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// An [IMF-fixdate][rfc] timestamp, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// [rfc]: <https://www.rfc-editor.org/rfc/rfc9110#section-5.6.7>
#[derive(Clone, Copy)]
pub(crate) struct HttpDate {
    buf: [u8; 29],
}

impl HttpDate {
    pub(crate) fn as_str(&self) -> &str {
        // only ascii digits and month/day names are ever written
        std::str::from_utf8(&self.buf).unwrap_or("Thu, 01 Jan 1970 00:00:00 GMT")
    }
}

impl fmt::Debug for HttpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create an [`HttpDate`] for the current time.
#[inline]
pub(crate) fn httpdate_now() -> HttpDate {
    httpdate(SystemTime::now())
}

/// Create an [`HttpDate`] for the given time.
pub(crate) fn httpdate(v: SystemTime) -> HttpDate {
    let secs_since_epoch = match v.duration_since(UNIX_EPOCH) {
        Ok(dur) => dur.as_secs().min(253402300799), // cap below year 10000
        Err(_) => 0,
    };

    /* 2000-03-01 (mod 400 year, immediately after feb29 */

    const LEAPOCH: i64 = 11017;
    const DAYS_PER_400Y: i64 = 365 * 400 + 97;
    const DAYS_PER_100Y: i64 = 365 * 100 + 24;
    const DAYS_PER_4Y: i64 = 365 * 4 + 1;

    let days = (secs_since_epoch / 86400) as i64 - LEAPOCH;
    let secs_of_day = secs_since_epoch % 86400;

    let mut qc_cycles = days / DAYS_PER_400Y;
    let mut remdays = days % DAYS_PER_400Y;

    if remdays < 0 {
        remdays += DAYS_PER_400Y;
        qc_cycles -= 1;
    }

    let mut c_cycles = remdays / DAYS_PER_100Y;
    if c_cycles == 4 {
        c_cycles -= 1;
    }
    remdays -= c_cycles * DAYS_PER_100Y;

    let mut q_cycles = remdays / DAYS_PER_4Y;
    if q_cycles == 25 {
        q_cycles -= 1;
    }
    remdays -= q_cycles * DAYS_PER_4Y;

    let mut remyears = remdays / 365;
    if remyears == 4 {
        remyears -= 1;
    }
    remdays -= remyears * 365;

    let mut year = 2000 + remyears + 4 * q_cycles + 100 * c_cycles + 400 * qc_cycles;

    let months = [31, 30, 31, 30, 31, 31, 30, 31, 30, 31, 31, 29];
    let mut mon = 0;
    for mon_len in months.iter() {
        mon += 1;
        if remdays < *mon_len {
            break;
        }
        remdays -= *mon_len;
    }
    let mday = remdays + 1;
    let mon = if mon + 2 > 12 {
        year += 1;
        mon - 10
    } else {
        mon + 2
    };

    // ===== Write =====

    let mut buf: [u8; 29] = *b"ddd, 00 mmm 0000 00:00:00 GMT";

    let mut wday = (3 + days) % 7;
    if wday <= 0 {
        wday += 7
    };
    buf[..3].copy_from_slice(match wday {
        1 => b"Mon",
        2 => b"Tue",
        3 => b"Wed",
        4 => b"Thu",
        5 => b"Fri",
        6 => b"Sat",
        _ => b"Sun",
    });

    let day = mday as u8;
    buf[5] = b'0' + (day / 10);
    buf[6] = b'0' + (day % 10);

    buf[8..11].copy_from_slice(match mon {
        1 => b"Jan",
        2 => b"Feb",
        3 => b"Mar",
        4 => b"Apr",
        5 => b"May",
        6 => b"Jun",
        7 => b"Jul",
        8 => b"Aug",
        9 => b"Sep",
        10 => b"Oct",
        11 => b"Nov",
        _ => b"Dec",
    });

    buf[12] = b'0' + (year / 1000) as u8;
    buf[13] = b'0' + (year / 100 % 10) as u8;
    buf[14] = b'0' + (year / 10 % 10) as u8;
    buf[15] = b'0' + (year % 10) as u8;

    let hour = (secs_of_day / 3600) as u8;
    buf[17] = b'0' + (hour / 10);
    buf[18] = b'0' + (hour % 10);

    let min = ((secs_of_day % 3600) / 60) as u8;
    buf[20] = b'0' + (min / 10);
    buf[21] = b'0' + (min % 10);

    let sec = (secs_of_day % 60) as u8;
    buf[23] = b'0' + (sec / 10);
    buf[24] = b'0' + (sec % 10);

    HttpDate { buf }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_httpdate() {
        let date = httpdate(UNIX_EPOCH + Duration::from_secs(784111777));
        assert_eq!(date.as_str(), "Sun, 06 Nov 1994 08:49:37 GMT");

        let date = httpdate(UNIX_EPOCH);
        assert_eq!(date.as_str(), "Thu, 01 Jan 1970 00:00:00 GMT");
    }
}
