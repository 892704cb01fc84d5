// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use courier_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for location indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct LocationIndexTag;

impl TypedIndexTag for LocationIndexTag {
    const NAME: &'static str = "LocationIndex";
}

/// A typed index for locations (graph vertices).
pub type LocationIndex = TypedIndex<LocationIndexTag>;

/// A tag type for package indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PackageIndexTag;

impl TypedIndexTag for PackageIndexTag {
    const NAME: &'static str = "PackageIndex";
}

/// A typed index for packages, dense in load order.
pub type PackageIndex = TypedIndex<PackageIndexTag>;

/// A tag type for truck indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TruckIndexTag;

impl TypedIndexTag for TruckIndexTag {
    const NAME: &'static str = "TruckIndex";
}

/// A typed index for trucks. Truck `i` is reported to users as truck number `i + 1`.
pub type TruckIndex = TypedIndex<TruckIndexTag>;
