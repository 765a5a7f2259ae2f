mod bitrate_tests;
mod codec_tests;
mod lane_tests;
