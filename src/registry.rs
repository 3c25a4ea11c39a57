use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    pub slug: String,
    pub external_id: String,
    pub display_name: String,
}

impl TeamEntry {
    pub fn new(slug: &str, external_id: &str, display_name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            external_id: external_id.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Ordered team table. Loaded once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<TeamEntry>,
}

impl Registry {
    pub fn new(entries: Vec<TeamEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.slug.trim().is_empty() {
                return Err(anyhow!("registry entry with empty slug"));
            }
            if !is_safe_slug(&entry.slug) {
                return Err(anyhow!("registry slug {} is not a plain file name", entry.slug));
            }
            if entry.external_id.trim().is_empty() {
                return Err(anyhow!("registry entry {} has no external id", entry.slug));
            }
            if !seen.insert(entry.slug.as_str()) {
                return Err(anyhow!("duplicate registry slug {}", entry.slug));
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_TEAMS
            .iter()
            .map(|(slug, external_id, name)| TeamEntry::new(slug, external_id, name))
            .collect();
        Self { entries }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read registry {}", path.display()))?;
        let entries: Vec<TeamEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid registry json {}", path.display()))?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[TeamEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&TeamEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.slug == slug)
    }
}

/// Slugs name files in the data dir, so they may not contain separators or `..`.
fn is_safe_slug(slug: &str) -> bool {
    slug != "." && !slug.contains("..") && !slug.contains(['/', '\\'])
}

// (slug, sports-reference school id, display name)
const BUILTIN_TEAMS: &[(&str, &str, &str)] = &[
    // SEC
    ("alabama", "alabama", "Alabama Crimson Tide"),
    ("arkansas", "arkansas", "Arkansas Razorbacks"),
    ("auburn", "auburn", "Auburn Tigers"),
    ("florida", "florida", "Florida Gators"),
    ("georgia", "georgia", "Georgia Bulldogs"),
    ("kentucky", "kentucky", "Kentucky Wildcats"),
    ("lsu", "louisiana-state", "LSU Tigers"),
    ("ole-miss", "mississippi", "Ole Miss Rebels"),
    ("mississippi-state", "mississippi-state", "Mississippi State Bulldogs"),
    ("missouri", "missouri", "Missouri Tigers"),
    ("oklahoma", "oklahoma", "Oklahoma Sooners"),
    ("south-carolina", "south-carolina", "South Carolina Gamecocks"),
    ("tennessee", "tennessee", "Tennessee Volunteers"),
    ("texas", "texas", "Texas Longhorns"),
    ("texas-am", "texas-am", "Texas A&M Aggies"),
    ("vanderbilt", "vanderbilt", "Vanderbilt Commodores"),
    // Big Ten
    ("illinois", "illinois", "Illinois Fighting Illini"),
    ("indiana", "indiana", "Indiana Hoosiers"),
    ("iowa", "iowa", "Iowa Hawkeyes"),
    ("maryland", "maryland", "Maryland Terrapins"),
    ("michigan", "michigan", "Michigan Wolverines"),
    ("michigan-state", "michigan-state", "Michigan State Spartans"),
    ("minnesota", "minnesota", "Minnesota Golden Gophers"),
    ("nebraska", "nebraska", "Nebraska Cornhuskers"),
    ("northwestern", "northwestern", "Northwestern Wildcats"),
    ("ohio-state", "ohio-state", "Ohio State Buckeyes"),
    ("oregon", "oregon", "Oregon Ducks"),
    ("penn-state", "penn-state", "Penn State Nittany Lions"),
    ("purdue", "purdue", "Purdue Boilermakers"),
    ("rutgers", "rutgers", "Rutgers Scarlet Knights"),
    ("ucla", "ucla", "UCLA Bruins"),
    ("usc", "southern-california", "USC Trojans"),
    ("washington", "washington", "Washington Huskies"),
    ("wisconsin", "wisconsin", "Wisconsin Badgers"),
    // ACC
    ("boston-college", "boston-college", "Boston College Eagles"),
    ("california", "california", "California Golden Bears"),
    ("clemson", "clemson", "Clemson Tigers"),
    ("duke", "duke", "Duke Blue Devils"),
    ("florida-state", "florida-state", "Florida State Seminoles"),
    ("georgia-tech", "georgia-tech", "Georgia Tech Yellow Jackets"),
    ("louisville", "louisville", "Louisville Cardinals"),
    ("miami", "miami-fl", "Miami Hurricanes"),
    ("nc-state", "north-carolina-state", "NC State Wolfpack"),
    ("north-carolina", "north-carolina", "North Carolina Tar Heels"),
    ("pitt", "pittsburgh", "Pittsburgh Panthers"),
    ("smu", "southern-methodist", "SMU Mustangs"),
    ("stanford", "stanford", "Stanford Cardinal"),
    ("syracuse", "syracuse", "Syracuse Orange"),
    ("virginia", "virginia", "Virginia Cavaliers"),
    ("virginia-tech", "virginia-tech", "Virginia Tech Hokies"),
    ("wake-forest", "wake-forest", "Wake Forest Demon Deacons"),
    // Big 12
    ("arizona", "arizona", "Arizona Wildcats"),
    ("arizona-state", "arizona-state", "Arizona State Sun Devils"),
    ("baylor", "baylor", "Baylor Bears"),
    ("byu", "brigham-young", "BYU Cougars"),
    ("cincinnati", "cincinnati", "Cincinnati Bearcats"),
    ("colorado", "colorado", "Colorado Buffaloes"),
    ("houston", "houston", "Houston Cougars"),
    ("iowa-state", "iowa-state", "Iowa State Cyclones"),
    ("kansas", "kansas", "Kansas Jayhawks"),
    ("kansas-state", "kansas-state", "Kansas State Wildcats"),
    ("oklahoma-state", "oklahoma-state", "Oklahoma State Cowboys"),
    ("tcu", "texas-christian", "TCU Horned Frogs"),
    ("texas-tech", "texas-tech", "Texas Tech Red Raiders"),
    ("ucf", "central-florida", "UCF Knights"),
    ("utah", "utah", "Utah Utes"),
    ("west-virginia", "west-virginia", "West Virginia Mountaineers"),
    // Pac-12
    ("oregon-state", "oregon-state", "Oregon State Beavers"),
    ("washington-state", "washington-state", "Washington State Cougars"),
    // Independents
    ("notre-dame", "notre-dame", "Notre Dame Fighting Irish"),
    ("uconn", "connecticut", "UConn Huskies"),
    // American
    ("army", "army", "Army Black Knights"),
    ("charlotte", "charlotte", "Charlotte 49ers"),
    ("east-carolina", "east-carolina", "East Carolina Pirates"),
    ("fau", "florida-atlantic", "Florida Atlantic Owls"),
    ("memphis", "memphis", "Memphis Tigers"),
    ("navy", "navy", "Navy Midshipmen"),
    ("north-texas", "north-texas", "North Texas Mean Green"),
    ("rice", "rice", "Rice Owls"),
    ("south-florida", "south-florida", "South Florida Bulls"),
    ("temple", "temple", "Temple Owls"),
    ("tulane", "tulane", "Tulane Green Wave"),
    ("tulsa", "tulsa", "Tulsa Golden Hurricane"),
    ("uab", "alabama-birmingham", "UAB Blazers"),
    ("utsa", "texas-san-antonio", "UTSA Roadrunners"),
    // Mountain West
    ("air-force", "air-force", "Air Force Falcons"),
    ("boise-state", "boise-state", "Boise State Broncos"),
    ("colorado-state", "colorado-state", "Colorado State Rams"),
    ("fresno-state", "fresno-state", "Fresno State Bulldogs"),
    ("hawaii", "hawaii", "Hawai'i Rainbow Warriors"),
    ("nevada", "nevada", "Nevada Wolf Pack"),
    ("new-mexico", "new-mexico", "New Mexico Lobos"),
    ("san-diego-state", "san-diego-state", "San Diego State Aztecs"),
    ("san-jose-state", "san-jose-state", "San Jose State Spartans"),
    ("unlv", "nevada-las-vegas", "UNLV Rebels"),
    ("utah-state", "utah-state", "Utah State Aggies"),
    ("wyoming", "wyoming", "Wyoming Cowboys"),
    // MAC
    ("akron", "akron", "Akron Zips"),
    ("ball-state", "ball-state", "Ball State Cardinals"),
    ("bowling-green", "bowling-green-state", "Bowling Green Falcons"),
    ("buffalo", "buffalo", "Buffalo Bulls"),
    ("central-michigan", "central-michigan", "Central Michigan Chippewas"),
    ("eastern-michigan", "eastern-michigan", "Eastern Michigan Eagles"),
    ("kent-state", "kent-state", "Kent State Golden Flashes"),
    ("miami-oh", "miami-oh", "Miami (OH) RedHawks"),
    ("northern-illinois", "northern-illinois", "Northern Illinois Huskies"),
    ("ohio", "ohio", "Ohio Bobcats"),
    ("toledo", "toledo", "Toledo Rockets"),
    ("western-michigan", "western-michigan", "Western Michigan Broncos"),
    ("umass", "massachusetts", "UMass Minutemen"),
    // Sun Belt
    ("app-state", "appalachian-state", "App State Mountaineers"),
    ("arkansas-state", "arkansas-state", "Arkansas State Red Wolves"),
    ("coastal-carolina", "coastal-carolina", "Coastal Carolina Chanticleers"),
    ("georgia-southern", "georgia-southern", "Georgia Southern Eagles"),
    ("georgia-state", "georgia-state", "Georgia State Panthers"),
    ("james-madison", "james-madison", "James Madison Dukes"),
    ("louisiana", "louisiana-lafayette", "Louisiana Ragin' Cajuns"),
    ("ul-monroe", "louisiana-monroe", "UL Monroe Warhawks"),
    ("marshall", "marshall", "Marshall Thundering Herd"),
    ("old-dominion", "old-dominion", "Old Dominion Monarchs"),
    ("south-alabama", "south-alabama", "South Alabama Jaguars"),
    ("southern-miss", "southern-mississippi", "Southern Miss Golden Eagles"),
    ("texas-state", "texas-state", "Texas State Bobcats"),
    ("troy", "troy", "Troy Trojans"),
    // Conference USA
    ("delaware", "delaware", "Delaware Blue Hens"),
    ("fiu", "florida-international", "FIU Panthers"),
    ("jacksonville-state", "jacksonville-state", "Jacksonville State Gamecocks"),
    ("kennesaw-state", "kennesaw-state", "Kennesaw State Owls"),
    ("liberty", "liberty", "Liberty Flames"),
    ("louisiana-tech", "louisiana-tech", "Louisiana Tech Bulldogs"),
    ("middle-tennessee", "middle-tennessee-state", "Middle Tennessee Blue Raiders"),
    ("missouri-state", "missouri-state", "Missouri State Bears"),
    ("new-mexico-state", "new-mexico-state", "New Mexico State Aggies"),
    ("sam-houston", "sam-houston-state", "Sam Houston Bearkats"),
    ("utep", "texas-el-paso", "UTEP Miners"),
    ("western-kentucky", "western-kentucky", "Western Kentucky Hilltoppers"),
];
