//! Pre-built in-memory fixture stores for testing.
//!
//! These scenarios describe realistic `data/mock-output` trees rooted at
//! [`SCENARIO_ROOT`], captured from a FreeBSD storage host.

use super::mock::MockFs;

/// Fixture root every scenario is mounted at.
pub const SCENARIO_ROOT: &str = "/data/mock-output";

const SMARTCTL_SCAN: &str = "\
/dev/ada0 -d atacam # /dev/ada0, ATA device
/dev/ada1 -d atacam # /dev/ada1, ATA device
/dev/ses0 -d atacam # /dev/ses0, ATA device
";

const PASSED: &str = "\
smartctl 7.2 2020-12-30 r5155 [FreeBSD 13.1-RELEASE-p3 amd64] (local build)
Copyright (C) 2002-20, Bruce Allen, Christian Franke, www.smartmontools.org

=== START OF READ SMART DATA SECTION ===
SMART overall-health self-assessment test result: PASSED

";

const ZFS_VOLUMES: &str = "\
zroot\t3189760000\t108290867200\t90112\t/zroot
zroot/ROOT\t2147483648\t108290867200\t90112\tnone
zroot/ROOT/default\t2147483648\t108290867200\t2147483648\t/
zroot/tmp\t139264\t108290867200\t139264\t/tmp
zroot/usr/home\t1020067840\t108290867200\t1020067840\t/usr/home
";

const ZFS_SNAPSHOTS: &str = "\
zroot/ROOT/default@2016-01-08-10:12:23\t1220608\t-\t2147483648\t-
zroot/usr/home@daily-2016-01-10\t73728\t-\t1020067840\t-
";

const ZPOOLS: &str = "\
tank\t3985729650688\t1257836490752\t2727893159936\t-\t-\t4\t31\t1.00\tONLINE\t-
zroot\t115964116992\t3189760000\t112774356992\t-\t-\t1\t2\t1.00\tONLINE\t-
";

impl MockFs {
    /// Adds the `info`, `health`, and `attributes` fixtures for one drive.
    pub fn add_smart_drive(
        &mut self,
        platform: &str,
        device: &str,
        info: &str,
        health: &str,
        attributes: &str,
    ) {
        let base = format!("{}/{}/smartctl", SCENARIO_ROOT, platform);
        self.add_file(format!("{}/info/{}", base, device), info);
        self.add_file(format!("{}/health/{}", base, device), health);
        self.add_file(format!("{}/attributes/{}", base, device), attributes);
    }

    /// A FreeBSD host with two SATA disks, an enclosure device, and two pools.
    pub fn freebsd_storage_host() -> Self {
        let mut fs = Self::new();
        let freebsd = format!("{}/freebsd", SCENARIO_ROOT);

        fs.add_file(format!("{}/smartctl/scan", freebsd), SMARTCTL_SCAN);
        fs.add_smart_drive(
            "freebsd",
            "ada0",
            "\
=== START OF INFORMATION SECTION ===
Model Family:     Western Digital Red
Device Model:     WDC WD40EFRX-68N32N0
Serial Number:    WD-WCC7K1234567
User Capacity:    4,000,787,030,016 bytes [4.00 TB]
Sector Sizes:     512 bytes logical, 4096 bytes physical
SMART support is: Available - device has SMART capability.
SMART support is: Enabled

",
            PASSED,
            "\
ID# ATTRIBUTE_NAME          FLAGS    VALUE WORST THRESH FAIL RAW_VALUE
0x01 Raw_Read_Error_Rate     0x002f   0xc8   0xc8   0x33    Pre-fail  Always       -       0
0x09 Power_On_Hours          0x0032   0x3c   0x3c   0x00    Old_age   Always       -       29310
0xc2 Temperature_Celsius     0x0022   0x71   0x6a   0x00    Old_age   Always       -       37
",
        );
        fs.add_smart_drive(
            "freebsd",
            "ada1",
            "\
=== START OF INFORMATION SECTION ===
Device Model:     Samsung SSD 850 EVO 250GB
Serial Number:    S21PNXAG123456X
User Capacity:    250,059,350,016 bytes [250 GB]
Sector Size:      512 bytes logical/physical
SMART support is: Available - device has SMART capability.
SMART support is: Enabled

",
            PASSED,
            "\
ID# ATTRIBUTE_NAME          FLAGS    VALUE WORST THRESH FAIL RAW_VALUE
0x05 Reallocated_Sector_Ct   0x0033   0x64   0x64   0x0a    Pre-fail  Always       -       0
0xb1 Wear_Leveling_Count     0x0013   0x62   0x62   0x00    Pre-fail  Always       -       21
",
        );
        fs.add_file(
            format!("{}/smartctl/info/ses0", freebsd),
            "/dev/ses0: Unable to detect device type\nPlease specify device type with the -d option.\n",
        );

        fs.add_file(format!("{}/zfs/volumes", freebsd), ZFS_VOLUMES);
        fs.add_file(format!("{}/zfs/snapshots", freebsd), ZFS_SNAPSHOTS);
        fs.add_file(format!("{}/zpool/zpools", freebsd), ZPOOLS);
        fs.add_file(
            format!("{}/zpool/iostat/zroot", freebsd),
            "\
              capacity     operations    bandwidth
pool        alloc   free   read  write   read  write
----------  -----  -----  -----  -----  -----  -----
zroot       2.97G   105G      0      3  5.12K  61.4K
  ada1p3    2.97G   105G      0      3  5.12K  61.4K
----------  -----  -----  -----  -----  -----  -----
",
        );
        fs.add_file(
            format!("{}/zpool/get/health/zroot", freebsd),
            "zroot\thealth\tONLINE\t-\n",
        );
        fs.add_file(
            format!("{}/zpool/get/feature@async_destroy/zroot", freebsd),
            "zroot\tfeature@async_destroy\tenabled\tlocal\n",
        );

        fs.add_file(
            format!("{}/df", freebsd),
            "\
Filesystem         1024-blocks    Used     Avail Capacity  Mounted on
zroot/ROOT/default   107850712 2097152 105753560     2%    /
devfs                        1       1         0   100%    /dev
",
        );

        fs
    }

    /// Fixtures whose exact bytes matter: trailing blanks, CRLF, no final newline.
    pub fn with_awkward_whitespace() -> Self {
        let mut fs = Self::new();
        let zfs = format!("{}/linux/zfs", SCENARIO_ROOT);
        fs.add_file(format!("{}/volumes", zfs), "tank\t1\t2\t3\t/tank  \r\n\n\n");
        fs.add_file(format!("{}/snapshots", zfs), "tank@now\t0\t-\t3\t-");
        fs
    }

    /// A store where rules match but the fixtures are missing or misplaced.
    pub fn with_broken_fixtures() -> Self {
        let mut fs = Self::new();
        let freebsd = format!("{}/freebsd", SCENARIO_ROOT);
        fs.add_file(format!("{}/smartctl/scan", freebsd), SMARTCTL_SCAN);
        // Drives listed by scan without per-device fixtures.
        fs.add_dir(format!("{}/smartctl/info", freebsd));
        // A directory where the volumes file should be.
        fs.add_dir(format!("{}/zfs/volumes", freebsd));
        fs
    }
}
