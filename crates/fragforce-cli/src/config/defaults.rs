use std::path::PathBuf;
use std::thread;

pub struct DefaultsConfig {
    pub input: PathBuf,
    pub log_file: PathBuf,
    pub cutoff: f64,
    pub cell: [f64; 3],
    pub pbc: bool,
    pub method: String,
    pub basis: String,
    pub memory: String,
    pub nproc: usize,
    pub one_body_keywords: String,
    pub two_body_keywords: String,
    pub extra_keywords: String,
    pub force_unit: f64,
    pub engine_command: String,
    pub total_cores: usize,
    pub job_list: PathBuf,
    pub job_dir: PathBuf,
    pub cache: PathBuf,
    pub output: PathBuf,
    pub connectivity_command: String,
    pub pdb: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("comb.xyz"),
            log_file: PathBuf::from("force.log"),
            cutoff: 3.5,
            cell: [0.0; 3],
            pbc: false,
            method: "mn15".to_string(),
            basis: "6-31g(d)".to_string(),
            memory: "400MW".to_string(),
            nproc: 4,
            one_body_keywords: "scf=(xqc,MaxConventionalCycles=256)".to_string(),
            two_body_keywords: "guess=mix scf=(maxcyc=256)".to_string(),
            extra_keywords: String::new(),
            force_unit: 1.0,
            engine_command: "g16".to_string(),
            total_cores: thread::available_parallelism().map_or(1, |n| n.get()),
            job_list: PathBuf::from("gaussianjobs"),
            job_dir: PathBuf::from("gaussian_files"),
            cache: PathBuf::from("kbforce.dat"),
            output: PathBuf::from("force.dat"),
            connectivity_command: "obabel".to_string(),
            pdb: PathBuf::from("comb.pdb"),
        }
    }
}
