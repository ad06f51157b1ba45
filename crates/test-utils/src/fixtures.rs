//! Small fixed input files in the on-disk delimited format.

/// A 2x2 bathymetry grid, north row first, over lon 18..19, lat -35..-34.
///
/// The south-east node is land (positive elevation).
pub const BATHYMETRY_2X2: &str = "\
* synthetic bathymetry
* lon,lat,depth
18.0,-34.0,-40.0
19.0,-34.0,-150.0
18.0,-35.0,-80.0
19.0,-35.0,12.0
";

/// One closed square sub-path.
pub const COASTLINE_SQUARE: &str = "\
* x,y,code
18.1,-34.1,1
18.4,-34.1,2
18.4,-34.4,2
18.1,-34.4,2
18.1,-34.1,79
";

/// Two sub-paths and one vertex with an unknown command code.
pub const COASTLINE_WITH_UNKNOWN_CODE: &str = "\
* x,y,code
18.1,-34.1,1
18.4,-34.1,2
18.3,-34.2,5
18.4,-34.4,2
18.1,-34.1,79
18.6,-34.6,1
18.9,-34.6,2
18.9,-34.9,2
18.6,-34.6,79
";

/// A landmark file holding only comments.
pub const LANDMARKS_EMPTY: &str = "\
* x,y,label
* no landmarks in this area
";

/// A few labels around False Bay.
pub const LANDMARKS_FALSE_BAY: &str = "\
* x,y,label
18.497,-34.357,Cape Point
18.433,-34.192,Simon's Town
18.470,-34.108,Muizenberg, Surfer's Corner
";
