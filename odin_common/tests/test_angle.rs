/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use odin_common::angle::*;

#[test]
fn test_normalize_360() {
    assert_eq!( 10.0, normalize_360( 370.0));
    assert_eq!( 40.0, normalize_360( 400.0));
    assert_eq!( 0.0, normalize_360( 0.0));
    assert_eq!( 0.0, normalize_360( 360.0));
    assert_eq!( 0.0, normalize_360( 720.0));
    assert_eq!( 330.0, normalize_360( -30.0));
    assert_eq!( 350.0, normalize_360( -370.0));
    assert_eq!( 0.0, normalize_360( -360.0));

    let x = normalize_360( -1e-15); // -1e-15 + 360.0 rounds to 360.0
    assert!( x >= 0.0 && x < 360.0);
}

#[test]
fn test_angle360() {
    let a = Angle360::from_degrees( 370.0);
    println!("display = {a}, debug = {a:?}");
    assert_eq!( 10.0, a.degrees());
    assert_eq!( "10.0°", format!("{a:.1}"));

    let b = Angle360::from_radians( -std::f64::consts::FRAC_PI_2);
    assert!( (b.degrees() - 270.0).abs() < 1e-9);

    assert_eq!( Angle360::ZERO, Angle360::default());
}

#[test]
fn test_angle360_display_padding() {
    let a = Angle360::from_degrees( 40.0);
    assert_eq!( "  40°", format!("{a:>5.0}"));
    assert_eq!( "  40°", format!("{a:5.0}"));
    assert_eq!( "40.0° |", format!("{a:<6.1}|"));
    assert_eq!( "*40°*", format!("{a:*^5.0}"));
    assert_eq!( "40°", format!("{a:2.0}")); // never truncated
}

#[test]
fn test_angle360_serde() {
    let a: Angle360 = serde_json::from_str("-90.0").unwrap();
    assert_eq!( 270.0, a.degrees());

    let s = serde_json::to_string( &Angle360::from_degrees(45.5)).unwrap();
    assert_eq!( "45.5", s);
}
