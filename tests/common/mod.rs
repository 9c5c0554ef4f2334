//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use houserocket::RawRecord;

pub const HEADER: &str = "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,view,condition,grade,sqft_above,sqft_basement,yr_built,yr_renovated,zipcode,lat,long,sqft_living15,sqft_lot15";

/// Minimal valid raw row; tests override the fields they care about
pub fn raw(id: i64, zipcode: u32, price: f64, condition: u8, month: u32) -> RawRecord {
    RawRecord {
        id,
        date: NaiveDate::from_ymd_opt(2014, month, 12).expect("valid date"),
        price,
        bedrooms: 3,
        bathrooms: Some(2.0),
        sqft_living: Some(1800.0),
        sqft_lot: 6000.0,
        floors: Some(1.0),
        waterfront: 0,
        view: Some(0.0),
        condition,
        grade: Some(7.0),
        sqft_above: Some(1800.0),
        sqft_basement: 0.0,
        yr_built: 1978,
        yr_renovated: 0,
        zipcode,
        lat: 47.55,
        long: -122.25,
    }
}

/// Render a CSV line in the source column layout
pub fn csv_line(id: i64, date: &str, price: &str, condition: &str, zipcode: u32, waterfront: u8) -> String {
    format!(
        "{},{},{},3,2,1800,6000,1,{},0,{},7,1800,0,1978,0,{},47.55,-122.25,1800,6000",
        id, date, price, waterfront, condition, zipcode
    )
}

pub fn csv_file(lines: &[String]) -> String {
    let mut out = String::from(HEADER);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out.push('\n');
    out
}
