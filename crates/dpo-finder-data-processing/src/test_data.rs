use std::io::Write;

use tempfile::NamedTempFile;
use tracing::info;

use super::error::Result;

/// Configuration for test data generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of offices to write, taken from the front of the sample directory
    pub rows: usize,
    /// Append rows with a blank PIN code (they must be dropped by the loader)
    pub include_unroutable_rows: bool,
    /// Write the public export headers (`Pincode`, `StateName`) instead of the canonical ones
    pub public_export_headers: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            rows: SAMPLE_OFFICES.len(),
            include_unroutable_rows: true,
            public_export_headers: true,
        }
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests: the two offices sharing PIN 560038
    pub fn minimal() -> Self {
        Self {
            rows: 2,
            include_unroutable_rows: false,
            public_export_headers: true,
        }
    }

    /// Sample data for integration tests
    pub fn sample() -> Self {
        Self::default()
    }
}

/// (circle, region, division, office, pin, type, delivery, district, state, lat, lon)
type OfficeRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

/// Sample postal directory. Order matters: several tests rely on "first record wins".
pub const SAMPLE_OFFICES: [OfficeRow; 12] = [
    (
        "Karnataka Circle",
        "Bangalore HQ Region",
        "Bangalore East Division",
        "Indiranagar S.O",
        "560038",
        "SO",
        "Delivery",
        "Bangalore Urban",
        "KARNATAKA",
        "12.9719",
        "77.6412",
    ),
    (
        "Karnataka Circle",
        "Bangalore HQ Region",
        "Bangalore East Division",
        "Majestic S.O",
        "560038",
        "SO",
        "Non-Delivery",
        "Bangalore Urban",
        "KARNATAKA",
        "",
        "",
    ),
    (
        "Andhra Pradesh Circle",
        "Kurnool Region",
        "Hindupur Division",
        "Peddakotla B.O",
        "515631",
        "BO",
        "Delivery",
        "ANANTAPUR",
        "ANDHRA PRADESH",
        "14.4412",
        "77.5531",
    ),
    (
        "Karnataka Circle",
        "Bangalore HQ Region",
        "Bangalore GPO Division",
        "Bangalore GPO",
        "560001",
        "GPO",
        "Delivery",
        "Bangalore Urban",
        "KARNATAKA",
        "12.9839",
        "77.5929",
    ),
    (
        "Delhi Circle",
        "Delhi Region",
        "New Delhi Central Division",
        "Connaught Place H.O",
        "110001",
        "HO",
        "Delivery",
        "New Delhi",
        "DELHI",
        "28.6315",
        "77.2167",
    ),
    (
        "Delhi Circle",
        "Delhi Region",
        "New Delhi Central Division",
        "Parliament Street H.O",
        "110001",
        "HO",
        "Non-Delivery",
        "New Delhi",
        "DELHI",
        "NA",
        "NA",
    ),
    (
        "Odisha Circle",
        "Bhubaneswar HQ Region",
        "Bhubaneswar Division",
        "Bhubaneswar GPO",
        "751001",
        "GPO",
        "Delivery",
        "KHURDA",
        "ODISHA",
        "20.2700",
        "85.8400",
    ),
    (
        "Odisha Circle",
        "Bhubaneswar HQ Region",
        "Bhubaneswar Division",
        "Kharabela Nagar S.O",
        "751003",
        "SO",
        "Delivery",
        "KHURDA",
        "ODISHA",
        "",
        "",
    ),
    (
        "Maharashtra Circle",
        "Mumbai Region",
        "Mumbai GPO Division",
        "Mumbai GPO",
        "400001",
        "GPO",
        "Delivery",
        "Mumbai",
        "MAHARASHTRA",
        "18.9398",
        "72.8355",
    ),
    (
        "Delhi Circle",
        "Delhi Region",
        "New Delhi West Division",
        "Nirman Bhawan S.O",
        "110011",
        "SO",
        "Non-Delivery",
        "New Delhi",
        "DELHI",
        "",
        "",
    ),
    (
        "Delhi Circle",
        "Delhi Region",
        "New Delhi West Division",
        "Udyog Bhawan S.O",
        "110011",
        "SO",
        "Non-Delivery",
        "New Delhi",
        "DELHI",
        "",
        "",
    ),
    (
        "Tamil Nadu Circle",
        "Chennai City Region",
        "Chennai City North Division",
        "Anna Nagar East S.O",
        "600102",
        "SO",
        "Delivery",
        "Chennai",
        "TAMIL NADU",
        "13.0878",
        "80.2185",
    ),
];

/// Rows without a PIN code; real exports contain a handful of these.
const UNROUTABLE_OFFICES: [OfficeRow; 2] = [
    (
        "Karnataka Circle",
        "Bangalore HQ Region",
        "Bangalore East Division",
        "Ghost Colony B.O",
        "",
        "BO",
        "Delivery",
        "Bangalore Urban",
        "KARNATAKA",
        "",
        "",
    ),
    (
        "Delhi Circle",
        "Delhi Region",
        "New Delhi Central Division",
        "Blank Pin S.O",
        "   ",
        "SO",
        "Delivery",
        "New Delhi",
        "DELHI",
        "",
        "",
    ),
];

/// Create a postal directory CSV in a temporary file.
///
/// Returns the file together with the number of routable offices written (rows that the
/// loader is expected to keep).
pub fn create_test_data(config: &TestDataConfig) -> Result<(NamedTempFile, usize)> {
    info!("Creating test data with config: {:?}", config);

    let mut file = NamedTempFile::new()?;
    let (pin_header, state_header) = if config.public_export_headers {
        ("Pincode", "StateName")
    } else {
        ("PINCode", "State")
    };
    writeln!(
        file,
        "CircleName,RegionName,DivisionName,OfficeName,{pin_header},OfficeType,Delivery,District,{state_header},Latitude,Longitude"
    )?;

    let rows = config.rows.min(SAMPLE_OFFICES.len());
    for row in &SAMPLE_OFFICES[..rows] {
        write_office_row(&mut file, row)?;
    }
    if config.include_unroutable_rows {
        for row in &UNROUTABLE_OFFICES {
            write_office_row(&mut file, row)?;
        }
    }

    file.flush()?;
    Ok((file, rows))
}

fn write_office_row(file: &mut NamedTempFile, row: &OfficeRow) -> Result<()> {
    let (circle, region, division, office, pin, office_type, delivery, district, state, lat, lon) =
        row;
    writeln!(
        file,
        "{circle},{region},{division},{office},{pin},{office_type},{delivery},{district},{state},{lat},{lon}"
    )?;
    Ok(())
}
