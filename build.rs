fn main() {
    // Windows resource compilation for version info and manifest
    #[cfg(windows)]
    {
        let res = winres::WindowsResource::new();
        res.compile().unwrap();
    }
}
